//! Contributor Repository (authors, compilers, translators, illustrators, editors)
//!
//! A contributor's `books` list is owned by the book side; this repository
//! only reads it, and on delete strips the contributor from every book.

use std::marker::PhantomData;

use shared::error::{AppError, AppResult};
use shared::models::{Book, Contributor, ContributorCreate, ContributorRole, ContributorUpdate};
use shared::query::ListQuery;
use shared::util::{new_id, now_millis};

use super::{ensure_unique, require_existing, same_name};
use crate::db::query::paginate;
use crate::db::references::unlink;
use crate::db::{DocumentStore, Scope, soft_delete};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

#[derive(Clone)]
pub struct ContributorRepository<R: ContributorRole> {
    store: DocumentStore,
    role: PhantomData<R>,
}

impl<R: ContributorRole> ContributorRepository<R> {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            role: PhantomData,
        }
    }

    fn name_taken(full_name: &str) -> AppError {
        AppError::already_exists(format!("{} '{}'", R::LABEL, full_name.trim()))
    }

    /// Active contributors, sorted and paged
    pub fn find_all(&self, query: &ListQuery) -> AppResult<Vec<Contributor<R>>> {
        let items = self.store.read()?.list::<Contributor<R>>()?;
        Ok(paginate(items, query))
    }

    pub fn find_by_id(&self, id: &str) -> AppResult<Contributor<R>> {
        self.store.read()?.require(id)
    }

    pub fn create(&self, data: ContributorCreate) -> AppResult<Contributor<R>> {
        validate_required_text(&data.full_name, "fullName", MAX_NAME_LEN)?;

        let mut scope = self.store.write()?;
        ensure_unique::<Contributor<R>>(
            &scope,
            None,
            |c| same_name(&c.full_name, &data.full_name),
            || Self::name_taken(&data.full_name),
        )?;

        let now = now_millis();
        let contributor = Contributor {
            id: new_id(),
            full_name: data.full_name.trim().to_string(),
            books: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            role: PhantomData,
        };
        scope.save(&contributor)?;
        scope.commit()?;

        tracing::info!(role = R::LABEL, id = %contributor.id, "Contributor created");
        Ok(contributor)
    }

    pub fn update(&self, id: &str, data: ContributorUpdate) -> AppResult<Contributor<R>> {
        let mut scope = self.store.write()?;
        let mut contributor = scope.require::<Contributor<R>>(id)?;

        if let Some(full_name) = data.full_name {
            validate_required_text(&full_name, "fullName", MAX_NAME_LEN)?;
            ensure_unique::<Contributor<R>>(
                &scope,
                Some(id),
                |c| same_name(&c.full_name, &full_name),
                || Self::name_taken(&full_name),
            )?;
            contributor.full_name = full_name.trim().to_string();
        }

        contributor.updated_at = now_millis();
        scope.save(&contributor)?;
        scope.commit()?;
        Ok(contributor)
    }

    /// Strip the contributor from every book that lists it, then tombstone it
    pub fn delete(&self, id: &str) -> AppResult<Contributor<R>> {
        let mut scope = self.store.write()?;
        let mut contributor = require_existing::<Contributor<R>>(&scope, id)?;
        if contributor.deleted_at.is_some() {
            return Err(AppError::already_removed(R::LABEL, id));
        }

        let now = now_millis();
        for book_id in &contributor.books {
            if let Some(mut book) = scope.find_any::<Book>(book_id)?
                && unlink(R::book_refs_mut(&mut book), id)
            {
                book.updated_at = now;
                scope.save(&book)?;
            }
        }
        contributor.books.clear();
        soft_delete(&mut scope, &mut contributor)?;
        scope.commit()?;

        tracing::info!(role = R::LABEL, id = %id, "Contributor deleted");
        Ok(contributor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use shared::models::{AuthorRole, TranslatorRole};

    fn repo<R: ContributorRole>(store: &DocumentStore) -> ContributorRepository<R> {
        ContributorRepository::new(store.clone())
    }

    fn create(name: &str) -> ContributorCreate {
        ContributorCreate {
            full_name: name.to_string(),
        }
    }

    #[test]
    fn test_unique_name_among_active() {
        let store = DocumentStore::open_in_memory().unwrap();
        let authors = repo::<AuthorRole>(&store);

        let first = authors.create(create("John Smith")).unwrap();
        assert!(first.books.is_empty());
        let err = authors.create(create(" John Smith ")).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        // names differing only in case belong to different people
        let other = authors.create(create("john smith")).unwrap();
        authors.delete(&other.id).unwrap();

        authors.delete(&first.id).unwrap();
        let again = authors.create(create("John Smith")).unwrap();
        assert_ne!(again.id, first.id);
    }

    #[test]
    fn test_roles_do_not_share_names() {
        let store = DocumentStore::open_in_memory().unwrap();
        repo::<AuthorRole>(&store).create(create("Ann Lee")).unwrap();
        assert!(repo::<TranslatorRole>(&store).create(create("Ann Lee")).is_ok());
    }

    #[test]
    fn test_rename_to_own_name_is_fine() {
        let store = DocumentStore::open_in_memory().unwrap();
        let authors = repo::<AuthorRole>(&store);
        let a = authors.create(create("Ann Lee")).unwrap();
        let updated = authors
            .update(
                &a.id,
                ContributorUpdate {
                    full_name: Some("Ann Lee".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.full_name, "Ann Lee");
    }

    #[test]
    fn test_delete_twice() {
        let store = DocumentStore::open_in_memory().unwrap();
        let authors = repo::<AuthorRole>(&store);
        let a = authors.create(create("Ann Lee")).unwrap();
        authors.delete(&a.id).unwrap();
        let err = authors.delete(&a.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyRemoved);
        let err = authors.delete("missing").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
