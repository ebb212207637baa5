//! Delivery configuration: countries, payment types and delivery types
//!
//! A delivery type declares which countries it ships to and which payment
//! types it accepts; order placement checks its choices against them.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Country, CountryCreate, DeliveryType, DeliveryTypeCreate, DeliveryTypeUpdate, PaymentType,
    PaymentTypeCreate,
};
use shared::util::{new_id, now_millis, slugify};

use super::{ensure_unique, require_existing};
use crate::db::references::{dedup, require_all};
use crate::db::{DocumentStore, Scope, soft_delete};
use crate::utils::validation::{
    Checks, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};

#[derive(Clone)]
pub struct DeliveryRepository {
    store: DocumentStore,
}

fn key_of(raw: &str) -> AppResult<String> {
    let key = slugify(raw);
    if key.is_empty() {
        return Err(AppError::validation("key must contain letters or digits"));
    }
    Ok(key)
}

fn validate_named(name: &str, key: &str) -> AppResult<String> {
    let mut checks = Checks::new();
    checks
        .check(validate_required_text(name, "name", MAX_NAME_LEN))
        .check(validate_required_text(key, "key", MAX_SHORT_TEXT_LEN));
    checks.finish()?;
    key_of(key)
}

impl DeliveryRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    // ==================== Countries ====================

    pub fn countries(&self) -> AppResult<Vec<Country>> {
        let mut items = self.store.read()?.list::<Country>()?;
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    pub fn create_country(&self, data: CountryCreate) -> AppResult<Country> {
        let key = validate_named(&data.name, &data.key)?;
        let mut scope = self.store.write()?;
        ensure_unique::<Country>(&scope, None, |c| c.key == key, || {
            AppError::already_exists(format!("Country '{key}'"))
        })?;

        let now = now_millis();
        let country = Country {
            id: new_id(),
            name: data.name.trim().to_string(),
            key,
            cities: dedup(
                &data
                    .cities
                    .iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect::<Vec<_>>(),
            ),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        scope.save(&country)?;
        scope.commit()?;
        Ok(country)
    }

    // ==================== Payment types ====================

    pub fn payment_types(&self) -> AppResult<Vec<PaymentType>> {
        let mut items = self.store.read()?.list::<PaymentType>()?;
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    pub fn create_payment_type(&self, data: PaymentTypeCreate) -> AppResult<PaymentType> {
        let key = validate_named(&data.name, &data.key)?;
        let mut scope = self.store.write()?;
        ensure_unique::<PaymentType>(&scope, None, |p| p.key == key, || {
            AppError::already_exists(format!("Payment type '{key}'"))
        })?;

        let now = now_millis();
        let payment_type = PaymentType {
            id: new_id(),
            name: data.name.trim().to_string(),
            key,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        scope.save(&payment_type)?;
        scope.commit()?;
        Ok(payment_type)
    }

    // ==================== Delivery types ====================

    pub fn delivery_types(&self) -> AppResult<Vec<DeliveryType>> {
        let mut items = self.store.read()?.list::<DeliveryType>()?;
        items.sort_by_key(|d| d.created_at);
        Ok(items)
    }

    pub fn delivery_type(&self, id: &str) -> AppResult<DeliveryType> {
        self.store
            .read()?
            .find::<DeliveryType>(id)?
            .ok_or_else(|| AppError::new(ErrorCode::DeliveryTypeNotFound).with_id(id))
    }

    pub fn create_delivery_type(&self, data: DeliveryTypeCreate) -> AppResult<DeliveryType> {
        let key = validate_named(&data.name, &data.key)?;
        if data.price.is_sign_negative() {
            return Err(AppError::validation("price must not be negative"));
        }

        let mut scope = self.store.write()?;
        ensure_unique::<DeliveryType>(&scope, None, |d| d.key == key, || {
            AppError::already_exists(format!("Delivery type '{key}'"))
        })?;
        let countries = dedup(&data.countries);
        let payment_types = dedup(&data.payment_types);
        require_all::<Country>(&scope, &countries)?;
        require_all::<PaymentType>(&scope, &payment_types)?;

        let now = now_millis();
        let delivery_type = DeliveryType {
            id: new_id(),
            name: data.name.trim().to_string(),
            key,
            price: data.price,
            is_price_variable: data.is_price_variable,
            requires_contact_info: data.requires_contact_info,
            requires_full_address: data.requires_full_address,
            countries,
            payment_types,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        scope.save(&delivery_type)?;
        scope.commit()?;

        tracing::info!(id = %delivery_type.id, key = %delivery_type.key, "Delivery type created");
        Ok(delivery_type)
    }

    pub fn update_delivery_type(&self, id: &str, data: DeliveryTypeUpdate) -> AppResult<DeliveryType> {
        let mut scope = self.store.write()?;
        let mut delivery_type = scope
            .find::<DeliveryType>(id)?
            .ok_or_else(|| AppError::new(ErrorCode::DeliveryTypeNotFound).with_id(id))?;

        if let Some(name) = data.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            delivery_type.name = name.trim().to_string();
        }
        if let Some(price) = data.price {
            if price.is_sign_negative() {
                return Err(AppError::validation("price must not be negative"));
            }
            delivery_type.price = price;
        }
        if let Some(flag) = data.is_price_variable {
            delivery_type.is_price_variable = flag;
        }
        if let Some(flag) = data.requires_contact_info {
            delivery_type.requires_contact_info = flag;
        }
        if let Some(flag) = data.requires_full_address {
            delivery_type.requires_full_address = flag;
        }
        if let Some(countries) = data.countries {
            let countries = dedup(&countries);
            require_all::<Country>(&scope, &countries)?;
            delivery_type.countries = countries;
        }
        if let Some(payment_types) = data.payment_types {
            let payment_types = dedup(&payment_types);
            require_all::<PaymentType>(&scope, &payment_types)?;
            delivery_type.payment_types = payment_types;
        }

        delivery_type.updated_at = now_millis();
        scope.save(&delivery_type)?;
        scope.commit()?;
        Ok(delivery_type)
    }

    pub fn delete_delivery_type(&self, id: &str) -> AppResult<DeliveryType> {
        let mut scope = self.store.write()?;
        let mut delivery_type = require_existing::<DeliveryType>(&scope, id)
            .map_err(|_| AppError::new(ErrorCode::DeliveryTypeNotFound).with_id(id))?;
        soft_delete(&mut scope, &mut delivery_type)?;
        scope.commit()?;
        Ok(delivery_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_delivery_type_requires_known_references() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = DeliveryRepository::new(store);
        let country = repo
            .create_country(CountryCreate {
                name: "Ukraine".to_string(),
                key: "UA".to_string(),
                cities: vec!["Kyiv".to_string(), " Kyiv ".to_string()],
            })
            .unwrap();
        assert_eq!(country.key, "ua");
        assert_eq!(country.cities, vec!["Kyiv".to_string()]);

        let cash = repo
            .create_payment_type(PaymentTypeCreate {
                name: "Cash".to_string(),
                key: "cash".to_string(),
            })
            .unwrap();

        let mut data = DeliveryTypeCreate {
            name: "Courier".to_string(),
            key: "courier".to_string(),
            price: Decimal::new(5000, 2),
            is_price_variable: false,
            requires_contact_info: true,
            requires_full_address: true,
            countries: vec![country.id.clone()],
            payment_types: vec![cash.id.clone(), "ghost".to_string()],
        };
        let err = repo.create_delivery_type(data.clone()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        data.payment_types = vec![cash.id.clone()];
        let created = repo.create_delivery_type(data.clone()).unwrap();
        assert_eq!(created.countries, vec![country.id]);
        assert_eq!(
            repo.create_delivery_type(data).unwrap_err().code,
            ErrorCode::AlreadyExists
        );

        repo.delete_delivery_type(&created.id).unwrap();
        assert_eq!(
            repo.delivery_type(&created.id).unwrap_err().code,
            ErrorCode::DeliveryTypeNotFound
        );
        assert_eq!(
            repo.delete_delivery_type(&created.id).unwrap_err().code,
            ErrorCode::AlreadyRemoved
        );
    }
}
