//! Order Repository
//!
//! Placement runs in one write transaction: guest account provisioning,
//! the contact/receiver/company/delivery snapshots, the order number, the
//! order itself and the cart cleanup either all land or none do.

use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    CartItem, CartItemRequest, Company, ContactInfo, ContactInfoInput, Country, Delivery,
    DeliveryInput, DeliveryType, Order, OrderCreate, OrderItem, OrderStatus, OrderStatusKey,
    PaymentType, Product, Role, User,
};
use shared::query::ListQuery;
use shared::util::{new_id, now_millis};

use super::cart::{cart_of, remove_from_cart};
use super::user::{NewUser, find_by_contacts, normalize_contacts, provision_user};
use crate::auth::password::{PasswordHash, generate_temporary_password, hash_password};
use crate::db::query::paginate;
use crate::db::{DocumentStore, ORDER_NUMBER_COUNTER, Scope, WriteScope};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};

/// Account created for a guest checkout, with its generated password
#[derive(Debug, Clone)]
pub struct GuestAccount {
    pub user: User,
    pub password: String,
}

/// Password for an account provisioned at guest checkout, hashed up front
#[derive(Debug, Clone)]
pub struct GuestCredentials {
    pub password: String,
    pub hash: PasswordHash,
}

impl GuestCredentials {
    /// Fresh temporary password; runs PBKDF2, so keep it off the async workers
    pub fn generate() -> AppResult<Self> {
        let password = generate_temporary_password()?;
        let hash = hash_password(&password)?;
        Ok(Self { password, hash })
    }
}

/// Who an order is placed for
#[derive(Debug, Clone)]
pub enum Buyer<'a> {
    User(&'a str),
    Guest(GuestCredentials),
}

#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub guest_account: Option<GuestAccount>,
}

#[derive(Clone)]
pub struct OrderRepository {
    store: DocumentStore,
}

fn invalid_option(msg: impl Into<String>) -> AppError {
    AppError::with_message(ErrorCode::InvalidDeliveryOption, msg)
}

fn contact_document(input: &ContactInfoInput, now: i64) -> AppResult<ContactInfo> {
    let (phone_number, email) = normalize_contacts(
        &input.first_name,
        &input.last_name,
        &input.phone_number,
        &input.email,
    )?;
    Ok(ContactInfo {
        id: new_id(),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        phone_number,
        email,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    })
}

/// Check the delivery choice against the delivery type's support lists
fn delivery_document(
    scope: &impl Scope,
    input: &DeliveryInput,
    payment_type: &str,
    now: i64,
) -> AppResult<Delivery> {
    let delivery_type = scope
        .find::<DeliveryType>(&input.delivery_type)?
        .ok_or_else(|| AppError::new(ErrorCode::DeliveryTypeNotFound).with_id(&input.delivery_type))?;
    let country = scope
        .find::<Country>(&input.country)?
        .ok_or_else(|| AppError::new(ErrorCode::CountryNotFound).with_id(&input.country))?;
    if scope.find::<PaymentType>(payment_type)?.is_none() {
        return Err(AppError::new(ErrorCode::PaymentTypeNotFound).with_id(payment_type));
    }

    if !delivery_type.countries.contains(&country.id) {
        return Err(invalid_option(format!(
            "{} does not deliver to {}",
            delivery_type.name, country.name
        )));
    }
    if !delivery_type.payment_types.iter().any(|p| p == payment_type) {
        return Err(invalid_option(format!(
            "{} does not accept this payment type",
            delivery_type.name
        )));
    }

    let city = input
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    if !country.cities.is_empty() {
        match city.as_deref() {
            Some(c) if country.cities.iter().any(|known| known == c) => {}
            Some(c) => return Err(invalid_option(format!("{} has no delivery to {c}", country.name))),
            None => return Err(invalid_option("city is required")),
        }
    }
    let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
    if delivery_type.requires_full_address && (blank(&input.street) || blank(&input.house)) {
        return Err(invalid_option(format!(
            "{} requires street and house",
            delivery_type.name
        )));
    }
    for (value, field) in [
        (&input.street, "street"),
        (&input.house, "house"),
        (&input.flat, "flat"),
        (&input.post_office, "postOffice"),
    ] {
        validate_optional_text(value, field, MAX_SHORT_TEXT_LEN)?;
    }

    Ok(Delivery {
        id: new_id(),
        delivery_type: delivery_type.id,
        country: country.id,
        city,
        street: input.street.clone(),
        house: input.house.clone(),
        flat: input.flat.clone(),
        post_office: input.post_office.clone(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    })
}

/// Requested lines, merged per product; signed-in users fall back to their cart
fn requested_items(
    scope: &impl Scope,
    user: Option<&User>,
    items: Option<Vec<CartItemRequest>>,
) -> AppResult<Vec<(String, u32)>> {
    let requested: Vec<(String, u32)> = match (items, user) {
        (Some(items), _) if !items.is_empty() => items
            .iter()
            .map(|r| (r.product.clone(), r.quantity()))
            .collect(),
        (_, Some(user)) => {
            let cart = cart_of(scope, &user.id)?;
            let mut lines = Vec::new();
            for item_id in &cart.items {
                if let Some(item) = scope.find::<CartItem>(item_id)? {
                    lines.push((item.product, item.quantity));
                }
            }
            lines
        }
        _ => Vec::new(),
    };

    let mut merged: Vec<(String, u32)> = Vec::with_capacity(requested.len());
    for (product, quantity) in requested {
        if quantity == 0 {
            return Err(AppError::validation("quantity must be at least 1"));
        }
        match merged.iter_mut().find(|(p, _)| *p == product) {
            Some((_, q)) => *q = q.saturating_add(quantity),
            None => merged.push((product, quantity)),
        }
    }
    if merged.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    Ok(merged)
}

fn snapshot(scope: &impl Scope, lines: &[(String, u32)]) -> AppResult<Vec<OrderItem>> {
    lines
        .iter()
        .map(|(id, quantity)| {
            let product = scope.require::<Product>(id)?;
            Ok(OrderItem {
                product: product.id,
                name: product.name,
                price: product.price,
                image: product.images.into_iter().next(),
                quantity: *quantity,
            })
        })
        .collect()
}

fn provision_guest(
    scope: &mut WriteScope,
    contact: &ContactInfo,
    credentials: GuestCredentials,
) -> AppResult<GuestAccount> {
    if let Some(owner) = find_by_contacts(&*scope, &contact.phone_number, &contact.email)? {
        return Err(AppError::new(ErrorCode::ContactBelongsToUser).with_id(owner.id));
    }
    let user = provision_user(
        scope,
        NewUser {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            phone_number: contact.phone_number.clone(),
            email: contact.email.clone(),
            credentials: credentials.hash,
            role: Role::User,
        },
    )?;
    Ok(GuestAccount {
        user,
        password: credentials.password,
    })
}

fn can_transition(from: OrderStatusKey, to: OrderStatusKey) -> bool {
    use OrderStatusKey::*;
    match from {
        Completed | Cancelled => from == to,
        _ => true,
    }
}

impl OrderRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Place an order for a signed-in user, or provision an account for a guest
    pub fn place(&self, buyer: Buyer<'_>, data: OrderCreate) -> AppResult<PlacedOrder> {
        validate_optional_text(&data.comment, "comment", MAX_NOTE_LEN)?;
        if let Some(company) = &data.company {
            validate_required_text(&company.name, "company.name", MAX_NAME_LEN)?;
            validate_required_text(
                &company.identification_number,
                "company.identificationNumber",
                MAX_SHORT_TEXT_LEN,
            )?;
        }
        let now = now_millis();
        let contact = contact_document(&data.contact_info, now)?;
        let receiver = data
            .receiver
            .as_ref()
            .map(|r| contact_document(r, now))
            .transpose()?;

        let mut scope = self.store.write()?;

        let (user, guest_account) = match buyer {
            Buyer::User(id) => {
                let user = scope
                    .find::<User>(id)?
                    .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_id(id))?;
                (user, None)
            }
            Buyer::Guest(credentials) => {
                let account = provision_guest(&mut scope, &contact, credentials)?;
                (account.user.clone(), Some(account))
            }
        };

        let signed_in = guest_account.is_none().then_some(&user);
        let lines = requested_items(&scope, signed_in, data.items)?;
        let items = snapshot(&scope, &lines)?;
        let delivery = delivery_document(&scope, &data.delivery, &data.payment_type, now)?;

        let company = data.company.map(|c| Company {
            id: new_id(),
            name: c.name.trim().to_string(),
            identification_number: c.identification_number.trim().to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        scope.save(&contact)?;
        if let Some(receiver) = &receiver {
            scope.save(receiver)?;
        }
        if let Some(company) = &company {
            scope.save(company)?;
        }
        scope.save(&delivery)?;

        let total_price = items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum();
        let number = scope.next_counter(ORDER_NUMBER_COUNTER)?;
        let order = Order {
            id: new_id(),
            number,
            user: user.id.clone(),
            contact_info: contact.id,
            receiver: receiver.map(|r| r.id),
            company: company.map(|c| c.id),
            delivery: delivery.id,
            payment_type: data.payment_type,
            items,
            status: OrderStatusKey::New.into(),
            total_price,
            comment: data.comment,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        scope.save(&order)?;

        if guest_account.is_none() {
            let mut cart = cart_of(&scope, &user.id)?;
            for item in &order.items {
                match remove_from_cart(&mut scope, &mut cart, &item.product, item.quantity) {
                    Err(e) if e.code == ErrorCode::CartItemNotFound => {}
                    other => other?,
                }
            }
        }
        scope.commit()?;

        tracing::info!(
            id = %order.id,
            number = order.number,
            user = %order.user,
            guest = guest_account.is_some(),
            "Order placed"
        );
        Ok(PlacedOrder {
            order,
            guest_account,
        })
    }

    /// Orders of `user_id`, or every order when `user_id` is `None`
    pub fn find_all(&self, user_id: Option<&str>, query: &ListQuery) -> AppResult<Vec<Order>> {
        let scope = self.store.read()?;
        let orders = match user_id {
            Some(id) => scope.filter::<Order>(|o| o.user == id)?,
            None => scope.list::<Order>()?,
        };
        Ok(paginate(orders, query))
    }

    pub fn find_by_id(&self, id: &str) -> AppResult<Order> {
        self.store
            .read()?
            .find::<Order>(id)?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_id(id))
    }

    /// Completed and cancelled orders are final
    pub fn update_status(&self, id: &str, key: OrderStatusKey) -> AppResult<Order> {
        let mut scope = self.store.write()?;
        let mut order = scope
            .find::<Order>(id)?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_id(id))?;
        if !can_transition(order.status.key, key) {
            return Err(AppError::with_message(
                ErrorCode::InvalidOrderStatus,
                format!(
                    "Order {} is {} and cannot become {}",
                    order.number,
                    order.status.name,
                    key.name()
                ),
            ));
        }
        order.status = OrderStatus::from(key);
        order.updated_at = now_millis();
        scope.save(&order)?;
        scope.commit()?;
        Ok(order)
    }
}
