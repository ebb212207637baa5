//! Cart Repository
//!
//! Each user owns one cart. Items are separate documents listed in
//! `Cart.items`; totals are recomputed on every read from the live product
//! prices and never stored.

use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Cart, CartItem, CartItemRequest, CartLine, CartView, Product, User};
use shared::util::{new_id, now_millis};

use crate::db::references::{link, unlink};
use crate::db::{DocumentStore, Scope, WriteScope, soft_delete};

#[derive(Clone)]
pub struct CartRepository {
    store: DocumentStore,
}

/// The active cart of an active user
pub(crate) fn cart_of(scope: &impl Scope, user_id: &str) -> AppResult<Cart> {
    let user = scope
        .find::<User>(user_id)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_id(user_id))?;
    scope
        .find::<Cart>(&user.cart)?
        .ok_or_else(|| AppError::new(ErrorCode::CartNotFound).with_id(&user.cart))
}

fn find_line(scope: &impl Scope, cart: &Cart, product_id: &str) -> AppResult<Option<CartItem>> {
    for item_id in &cart.items {
        if let Some(item) = scope.find::<CartItem>(item_id)?
            && item.product == product_id
        {
            return Ok(Some(item));
        }
    }
    Ok(None)
}

/// Increment the line for `product_id`, creating it if absent
pub(crate) fn add_to_cart(
    scope: &mut WriteScope,
    cart: &mut Cart,
    product_id: &str,
    quantity: u32,
) -> AppResult<CartItem> {
    if quantity == 0 {
        return Err(AppError::validation("quantity must be at least 1"));
    }
    scope.require::<Product>(product_id)?;

    let now = now_millis();
    let item = match find_line(&*scope, cart, product_id)? {
        Some(mut item) => {
            item.quantity = item.quantity.saturating_add(quantity);
            item.updated_at = now;
            item
        }
        None => {
            let item = CartItem {
                id: new_id(),
                cart: cart.id.clone(),
                product: product_id.to_string(),
                quantity,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            link(&mut cart.items, &item.id);
            cart.updated_at = now;
            scope.save(&*cart)?;
            item
        }
    };
    scope.save(&item)?;
    Ok(item)
}

/// Decrement the line for `product_id`; at zero the line is removed
pub(crate) fn remove_from_cart(
    scope: &mut WriteScope,
    cart: &mut Cart,
    product_id: &str,
    quantity: u32,
) -> AppResult<()> {
    if quantity == 0 {
        return Err(AppError::validation("quantity must be at least 1"));
    }
    let Some(mut item) = find_line(&*scope, cart, product_id)? else {
        return Err(AppError::new(ErrorCode::CartItemNotFound)
            .with_detail("product", product_id)
            .with_detail("cart", cart.id.clone()));
    };

    if item.quantity > quantity {
        item.quantity -= quantity;
        item.updated_at = now_millis();
        scope.save(&item)?;
        return Ok(());
    }

    unlink(&mut cart.items, &item.id);
    cart.updated_at = now_millis();
    scope.save(&*cart)?;
    soft_delete(scope, &mut item)
}

fn drop_all(scope: &mut WriteScope, cart: &mut Cart) -> AppResult<()> {
    for item_id in std::mem::take(&mut cart.items) {
        if let Some(mut item) = scope.find::<CartItem>(&item_id)? {
            soft_delete(scope, &mut item)?;
        }
    }
    cart.updated_at = now_millis();
    scope.save(&*cart)?;
    Ok(())
}

/// Populate the cart and compute its totals. Lines whose product is gone are skipped.
pub(crate) fn view_of(scope: &impl Scope, cart: &Cart) -> AppResult<CartView> {
    let mut lines = Vec::with_capacity(cart.items.len());
    let mut total_price = Decimal::ZERO;
    let mut total_quantity = 0u32;

    for item_id in &cart.items {
        let Some(item) = scope.find::<CartItem>(item_id)? else {
            continue;
        };
        let Some(product) = scope.find::<Product>(&item.product)? else {
            continue;
        };
        let subtotal = product.price * Decimal::from(item.quantity);
        total_price += subtotal;
        total_quantity = total_quantity.saturating_add(item.quantity);
        lines.push(CartLine {
            id: item.id,
            product,
            quantity: item.quantity,
            subtotal,
        });
    }

    Ok(CartView {
        id: cart.id.clone(),
        user: cart.user.clone(),
        items: lines,
        total_price,
        total_quantity,
    })
}

impl CartRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn view(&self, user_id: &str) -> AppResult<CartView> {
        let scope = self.store.read()?;
        let cart = cart_of(&scope, user_id)?;
        view_of(&scope, &cart)
    }

    pub fn add_item(&self, user_id: &str, req: &CartItemRequest) -> AppResult<CartView> {
        self.mutate(user_id, |scope, cart| {
            add_to_cart(scope, cart, &req.product, req.quantity())?;
            Ok(())
        })
    }

    pub fn remove_item(&self, user_id: &str, req: &CartItemRequest) -> AppResult<CartView> {
        self.mutate(user_id, |scope, cart| {
            remove_from_cart(scope, cart, &req.product, req.quantity())
        })
    }

    /// Add every incoming line; all or nothing
    pub fn merge(&self, user_id: &str, items: &[CartItemRequest]) -> AppResult<CartView> {
        self.mutate(user_id, |scope, cart| {
            for req in items {
                add_to_cart(scope, cart, &req.product, req.quantity())?;
            }
            Ok(())
        })
    }

    pub fn clear(&self, user_id: &str) -> AppResult<CartView> {
        self.mutate(user_id, drop_all)
    }

    fn mutate(
        &self,
        user_id: &str,
        apply: impl FnOnce(&mut WriteScope, &mut Cart) -> AppResult<()>,
    ) -> AppResult<CartView> {
        let mut scope = self.store.write()?;
        let mut cart = cart_of(&scope, user_id)?;
        apply(&mut scope, &mut cart)?;
        let view = view_of(&scope, &cart)?;
        scope.commit()?;
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::db::repository::user::{NewUser, provision_user};
    use shared::models::Role;

    fn seed() -> (DocumentStore, String) {
        let store = DocumentStore::open_in_memory().unwrap();
        let mut scope = store.write().unwrap();
        let user = provision_user(
            &mut scope,
            NewUser {
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                phone_number: "+380501234567".to_string(),
                email: "ann@example.com".to_string(),
                credentials: hash_password("41424344").unwrap(),
                role: Role::User,
            },
        )
        .unwrap();
        for (id, cents) in [("p1", 1000), ("p2", 250)] {
            scope
                .save(&Product {
                    id: id.to_string(),
                    name: id.to_uppercase(),
                    key: id.to_string(),
                    code: 1,
                    price: Decimal::new(cents, 2),
                    quantity: 10,
                    product_type: "t".to_string(),
                    sections: vec![],
                    images: vec![],
                    specific_product: None,
                    created_at: 0,
                    updated_at: 0,
                    deleted_at: None,
                })
                .unwrap();
        }
        scope.commit().unwrap();
        (store, user.id)
    }

    fn req(product: &str, quantity: Option<u32>) -> CartItemRequest {
        CartItemRequest {
            product: product.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_repeat_add_increments_single_line() {
        let (store, user) = seed();
        let repo = CartRepository::new(store);
        repo.add_item(&user, &req("p1", None)).unwrap();
        let view = repo.add_item(&user, &req("p1", None)).unwrap();

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].quantity, 2);
        assert_eq!(view.total_quantity, 2);
        assert_eq!(view.total_price, Decimal::new(2000, 2));
    }

    #[test]
    fn test_remove_below_one_drops_line() {
        let (store, user) = seed();
        let repo = CartRepository::new(store);
        repo.add_item(&user, &req("p1", Some(2))).unwrap();

        let view = repo.remove_item(&user, &req("p1", None)).unwrap();
        assert_eq!(view.items[0].quantity, 1);
        let view = repo.remove_item(&user, &req("p1", Some(5))).unwrap();
        assert!(view.items.is_empty());

        let err = repo.remove_item(&user, &req("p1", None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartItemNotFound);
    }

    #[test]
    fn test_zero_quantity_is_rejected_both_ways() {
        let (store, user) = seed();
        let repo = CartRepository::new(store);
        repo.add_item(&user, &req("p1", Some(1))).unwrap();

        let err = repo.add_item(&user, &req("p1", Some(0))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let err = repo.remove_item(&user, &req("p1", Some(0))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(repo.view(&user).unwrap().items[0].quantity, 1);
    }

    #[test]
    fn test_merge_and_clear() {
        let (store, user) = seed();
        let repo = CartRepository::new(store);
        repo.add_item(&user, &req("p1", None)).unwrap();

        let view = repo
            .merge(&user, &[req("p1", Some(2)), req("p2", Some(4))])
            .unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total_quantity, 7);
        assert_eq!(view.total_price, Decimal::new(4000, 2));

        let err = repo.merge(&user, &[req("p2", None), req("ghost", None)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(repo.view(&user).unwrap().total_quantity, 7);

        assert!(repo.clear(&user).unwrap().items.is_empty());
    }
}
