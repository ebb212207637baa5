//! Logical deletion
//!
//! Callers strip the document's id from every list that references it
//! first (see [`super::references`]), then mark it here.

use shared::error::{AppError, AppResult};
use shared::util::now_millis;

use super::document::Document;
use super::store::WriteScope;

/// Set `deletedAt` and persist. Fails with a conflict if already removed.
pub fn soft_delete<T: Document>(scope: &mut WriteScope, doc: &mut T) -> AppResult<()> {
    if doc.deleted_at().is_some() {
        return Err(AppError::already_removed(T::LABEL, doc.id()));
    }
    doc.set_deleted_at(now_millis());
    scope.save(doc)?;
    tracing::debug!(collection = T::COLLECTION, id = %doc.id(), "Document soft-deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DocumentStore, Scope};
    use shared::error::ErrorCode;
    use shared::models::Review;

    #[test]
    fn test_soft_delete_twice_conflicts() {
        let store = DocumentStore::open_in_memory().unwrap();
        let mut review = Review {
            id: "r1".to_string(),
            product: "p1".to_string(),
            user: "u1".to_string(),
            rating: 5,
            text: None,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        };
        let mut scope = store.write().unwrap();
        scope.save(&review).unwrap();
        soft_delete(&mut scope, &mut review).unwrap();
        assert!(review.deleted_at.is_some());

        let err = soft_delete(&mut scope, &mut review).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyRemoved);
        scope.commit().unwrap();

        let read = store.read().unwrap();
        assert!(read.find::<Review>("r1").unwrap().is_none());
        assert!(read.find_any::<Review>("r1").unwrap().unwrap().deleted_at.is_some());
    }
}
