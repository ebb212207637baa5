//! Review Repository

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Product, Review, ReviewCreate, User};
use shared::query::ListQuery;
use shared::util::{new_id, now_millis};

use crate::db::query::paginate;
use crate::db::{DocumentStore, Scope, soft_delete};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

#[derive(Clone)]
pub struct ReviewRepository {
    store: DocumentStore,
}

impl ReviewRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Reviews of an active product
    pub fn find_by_product(&self, product_id: &str, query: &ListQuery) -> AppResult<Vec<Review>> {
        let scope = self.store.read()?;
        scope.require::<Product>(product_id)?;
        let reviews = scope.filter::<Review>(|r| r.product == product_id)?;
        Ok(paginate(reviews, query))
    }

    pub fn find_by_id(&self, id: &str) -> AppResult<Review> {
        self.store
            .read()?
            .find::<Review>(id)?
            .ok_or_else(|| AppError::new(ErrorCode::ReviewNotFound).with_id(id))
    }

    pub fn create(&self, product_id: &str, user_id: &str, data: ReviewCreate) -> AppResult<Review> {
        if !(1..=5).contains(&data.rating) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "rating must be between 1 and 5",
            ));
        }
        validate_optional_text(&data.text, "text", MAX_NOTE_LEN)?;

        let mut scope = self.store.write()?;
        scope.require::<Product>(product_id)?;
        if scope.find::<User>(user_id)?.is_none() {
            return Err(AppError::new(ErrorCode::UserNotFound).with_id(user_id));
        }

        let now = now_millis();
        let review = Review {
            id: new_id(),
            product: product_id.to_string(),
            user: user_id.to_string(),
            rating: data.rating,
            text: data
                .text
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        scope.save(&review)?;
        scope.commit()?;
        Ok(review)
    }

    /// Only the author, or a caller with `override_owner`, may delete
    pub fn delete(&self, id: &str, user_id: &str, override_owner: bool) -> AppResult<Review> {
        let mut scope = self.store.write()?;
        let mut review = scope
            .find_any::<Review>(id)?
            .ok_or_else(|| AppError::new(ErrorCode::ReviewNotFound).with_id(id))?;
        if review.user != user_id && !override_owner {
            return Err(AppError::forbidden("Only the author can delete this review"));
        }
        soft_delete(&mut scope, &mut review)?;
        scope.commit()?;
        Ok(review)
    }
}
