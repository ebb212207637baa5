//! Product Type Repository

use shared::error::{AppError, AppResult};
use shared::models::{ProductKind, ProductType, ProductTypeCreate};
use shared::util::{new_id, now_millis};

use super::ensure_unique;
use crate::db::{DocumentStore, Scope};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

/// Types every fresh database starts with
const DEFAULT_TYPES: [(&str, ProductKind); 2] = [
    ("Book", ProductKind::Book),
    ("Board game", ProductKind::BoardGame),
];

#[derive(Clone)]
pub struct ProductTypeRepository {
    store: DocumentStore,
}

impl ProductTypeRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Insert the default types that are missing. Returns how many were added.
    pub fn ensure_defaults(&self) -> AppResult<usize> {
        let mut scope = self.store.write()?;
        let existing = scope.list::<ProductType>()?;
        let now = now_millis();
        let mut added = 0;

        for (name, key) in DEFAULT_TYPES {
            if existing.iter().any(|t| t.key == key) {
                continue;
            }
            scope.save(&ProductType {
                id: new_id(),
                name: name.to_string(),
                key,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            })?;
            added += 1;
        }
        scope.commit()?;

        if added > 0 {
            tracing::info!(added, "Seeded product types");
        }
        Ok(added)
    }

    pub fn find_all(&self) -> AppResult<Vec<ProductType>> {
        let mut types = self.store.read()?.list::<ProductType>()?;
        types.sort_by_key(|t| t.created_at);
        Ok(types)
    }

    pub fn find_by_id(&self, id: &str) -> AppResult<ProductType> {
        self.store.read()?.require(id)
    }

    pub fn create(&self, data: ProductTypeCreate) -> AppResult<ProductType> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;

        let mut scope = self.store.write()?;
        ensure_unique::<ProductType>(
            &scope,
            None,
            |t| t.key == data.key,
            || AppError::already_exists(format!("Product type '{}'", data.key.as_str())),
        )?;

        let now = now_millis();
        let product_type = ProductType {
            id: new_id(),
            name: data.name.trim().to_string(),
            key: data.key,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        scope.save(&product_type)?;
        scope.commit()?;
        Ok(product_type)
    }
}
