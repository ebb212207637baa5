//! Publisher Repository

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Book, BookSeries, Publisher, PublisherCreate, PublisherUpdate};
use shared::query::ListQuery;
use shared::util::{new_id, now_millis};

use super::{ensure_unique, require_existing, same_name};
use crate::db::query::paginate;
use crate::db::{DocumentStore, Scope, soft_delete};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

#[derive(Clone)]
pub struct PublisherRepository {
    store: DocumentStore,
}

fn name_taken(name: &str) -> AppError {
    AppError::already_exists(format!("Publisher '{}'", name.trim()))
}

impl PublisherRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn find_all(&self, query: &ListQuery) -> AppResult<Vec<Publisher>> {
        let items = self.store.read()?.list::<Publisher>()?;
        Ok(paginate(items, query))
    }

    pub fn find_by_id(&self, id: &str) -> AppResult<Publisher> {
        self.store.read()?.require(id)
    }

    pub fn create(&self, data: PublisherCreate) -> AppResult<Publisher> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;

        let mut scope = self.store.write()?;
        ensure_unique::<Publisher>(
            &scope,
            None,
            |p| same_name(&p.name, &data.name),
            || name_taken(&data.name),
        )?;

        let now = now_millis();
        let publisher = Publisher {
            id: new_id(),
            name: data.name.trim().to_string(),
            books: Vec::new(),
            book_series: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        scope.save(&publisher)?;
        scope.commit()?;

        tracing::info!(id = %publisher.id, name = %publisher.name, "Publisher created");
        Ok(publisher)
    }

    pub fn update(&self, id: &str, data: PublisherUpdate) -> AppResult<Publisher> {
        let mut scope = self.store.write()?;
        let mut publisher = scope.require::<Publisher>(id)?;

        if let Some(name) = data.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            ensure_unique::<Publisher>(
                &scope,
                Some(id),
                |p| same_name(&p.name, &name),
                || name_taken(&name),
            )?;
            publisher.name = name.trim().to_string();
        }

        publisher.updated_at = now_millis();
        scope.save(&publisher)?;
        scope.commit()?;
        Ok(publisher)
    }

    /// Refuses while books still reference the publisher; its series go with it
    pub fn delete(&self, id: &str) -> AppResult<Publisher> {
        let mut scope = self.store.write()?;
        let mut publisher = require_existing::<Publisher>(&scope, id)?;
        if publisher.deleted_at.is_some() {
            return Err(AppError::already_removed("Publisher", id));
        }
        if !publisher.books.is_empty() {
            return Err(AppError::business_rule(ErrorCode::PublisherHasBooks)
                .with_id(id)
                .with_detail("books", publisher.books.len()));
        }

        let now = now_millis();
        for series_id in &publisher.book_series {
            let Some(mut series) = scope.find::<BookSeries>(series_id)? else {
                continue;
            };
            for book_id in &series.books {
                if let Some(mut book) = scope.find_any::<Book>(book_id)?
                    && book.series.as_deref() == Some(series_id.as_str())
                {
                    book.series = None;
                    book.updated_at = now;
                    scope.save(&book)?;
                }
            }
            series.books.clear();
            soft_delete(&mut scope, &mut series)?;
        }

        publisher.book_series.clear();
        soft_delete(&mut scope, &mut publisher)?;
        scope.commit()?;

        tracing::info!(id = %id, "Publisher deleted");
        Ok(publisher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::BookSeriesRepository;
    use shared::models::BookSeriesCreate;

    fn create(name: &str) -> PublisherCreate {
        PublisherCreate {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_name_is_unique() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = PublisherRepository::new(store);
        repo.create(create("Folio")).unwrap();
        let err = repo.create(create(" Folio")).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }

    #[test]
    fn test_delete_cascades_to_series() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = PublisherRepository::new(store.clone());
        let series_repo = BookSeriesRepository::new(store.clone());

        let publisher = repo.create(create("Folio")).unwrap();
        let series = series_repo
            .create(BookSeriesCreate {
                name: "Classics".to_string(),
                publisher: publisher.id.clone(),
                books: vec![],
            })
            .unwrap();

        let deleted = repo.delete(&publisher.id).unwrap();
        assert!(deleted.deleted_at.is_some());
        let read = store.read().unwrap();
        assert!(read.find::<BookSeries>(&series.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_refused_while_books_exist() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = PublisherRepository::new(store.clone());
        let mut publisher = repo.create(create("Folio")).unwrap();

        publisher.books.push("b1".to_string());
        let mut scope = store.write().unwrap();
        scope.save(&publisher).unwrap();
        scope.commit().unwrap();

        let err = repo.delete(&publisher.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::PublisherHasBooks);
        assert!(repo.find_by_id(&publisher.id).is_ok());
    }
}
