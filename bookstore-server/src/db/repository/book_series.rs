//! Book Series Repository
//!
//! A series belongs to exactly one publisher (listed in
//! `Publisher.bookSeries`) and owns its `books` list; `Book.series` mirrors
//! it. Moving a book into a series takes it out of its previous one.

use shared::error::{AppError, AppResult};
use shared::models::{Book, BookSeries, BookSeriesCreate, BookSeriesUpdate, Publisher};
use shared::query::ListQuery;
use shared::util::{new_id, now_millis};

use super::{ensure_unique, publisher_series, require_existing, same_name, series_books};
use crate::db::query::paginate;
use crate::db::references::{dedup, delta, link, require_all, unlink};
use crate::db::{DocumentStore, Scope, WriteScope, soft_delete};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

#[derive(Clone)]
pub struct BookSeriesRepository {
    store: DocumentStore,
}

fn name_taken(name: &str) -> AppError {
    AppError::already_exists(format!("Book series '{}'", name.trim()))
}

/// Replace the series' book list and point each book's `series` back at it
fn sync_books(
    scope: &mut WriteScope,
    series_id: &str,
    old: &[String],
    new: &[String],
) -> AppResult<Vec<String>> {
    let new = dedup(new);
    let books = require_all::<Book>(&*scope, &new)?;
    let changes = delta(old, &new);
    let now = now_millis();

    for mut book in books {
        if !changes.added.contains(&book.id) {
            continue;
        }
        if let Some(previous) = book.series.take()
            && previous != series_id
            && let Some(mut other) = scope.find_any::<BookSeries>(&previous)?
            && unlink(series_books(&mut other), &book.id)
        {
            other.updated_at = now;
            scope.save(&other)?;
        }
        book.series = Some(series_id.to_string());
        book.updated_at = now;
        scope.save(&book)?;
    }

    for id in &changes.removed {
        if let Some(mut book) = scope.find_any::<Book>(id)?
            && book.series.as_deref() == Some(series_id)
        {
            book.series = None;
            book.updated_at = now;
            scope.save(&book)?;
        }
    }

    Ok(new)
}

impl BookSeriesRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn find_all(&self, query: &ListQuery) -> AppResult<Vec<BookSeries>> {
        let items = self.store.read()?.list::<BookSeries>()?;
        Ok(paginate(items, query))
    }

    pub fn find_by_id(&self, id: &str) -> AppResult<BookSeries> {
        self.store.read()?.require(id)
    }

    pub fn create(&self, data: BookSeriesCreate) -> AppResult<BookSeries> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;

        let mut scope = self.store.write()?;
        let mut publisher = scope.require::<Publisher>(&data.publisher)?;
        ensure_unique::<BookSeries>(
            &scope,
            None,
            |s| s.publisher == publisher.id && same_name(&s.name, &data.name),
            || name_taken(&data.name),
        )?;

        let now = now_millis();
        let mut series = BookSeries {
            id: new_id(),
            name: data.name.trim().to_string(),
            publisher: publisher.id.clone(),
            books: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        series.books = sync_books(&mut scope, &series.id, &[], &data.books)?;
        scope.save(&series)?;

        if link(publisher_series(&mut publisher), &series.id) {
            publisher.updated_at = now;
            scope.save(&publisher)?;
        }
        scope.commit()?;

        tracing::info!(id = %series.id, publisher = %series.publisher, "Book series created");
        Ok(series)
    }

    pub fn update(&self, id: &str, data: BookSeriesUpdate) -> AppResult<BookSeries> {
        let mut scope = self.store.write()?;
        let mut series = scope.require::<BookSeries>(id)?;

        if let Some(name) = data.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            let publisher = series.publisher.clone();
            ensure_unique::<BookSeries>(
                &scope,
                Some(id),
                |s| s.publisher == publisher && same_name(&s.name, &name),
                || name_taken(&name),
            )?;
            series.name = name.trim().to_string();
        }

        if let Some(books) = data.books {
            series.books = sync_books(&mut scope, id, &series.books, &books)?;
        }

        series.updated_at = now_millis();
        scope.save(&series)?;
        scope.commit()?;
        Ok(series)
    }

    pub fn delete(&self, id: &str) -> AppResult<BookSeries> {
        let mut scope = self.store.write()?;
        let mut series = require_existing::<BookSeries>(&scope, id)?;
        if series.deleted_at.is_some() {
            return Err(AppError::already_removed("Book series", id));
        }

        let books = std::mem::take(&mut series.books);
        sync_books(&mut scope, id, &books, &[])?;

        if let Some(mut publisher) = scope.find_any::<Publisher>(&series.publisher)?
            && unlink(publisher_series(&mut publisher), id)
        {
            publisher.updated_at = now_millis();
            scope.save(&publisher)?;
        }

        soft_delete(&mut scope, &mut series)?;
        scope.commit()?;
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    fn seed(store: &DocumentStore) -> (Publisher, Vec<Book>) {
        let mut scope = store.write().unwrap();
        let publisher = Publisher {
            id: "pub1".to_string(),
            name: "Folio".to_string(),
            books: vec![],
            book_series: vec![],
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        };
        scope.save(&publisher).unwrap();
        let books: Vec<Book> = ["b1", "b2"]
            .iter()
            .map(|id| Book::new(id.to_string(), format!("p-{id}")))
            .collect();
        for b in &books {
            scope.save(b).unwrap();
        }
        scope.commit().unwrap();
        (publisher, books)
    }

    fn create(name: &str, books: &[&str]) -> BookSeriesCreate {
        BookSeriesCreate {
            name: name.to_string(),
            publisher: "pub1".to_string(),
            books: books.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_create_links_publisher_and_books() {
        let store = DocumentStore::open_in_memory().unwrap();
        seed(&store);
        let repo = BookSeriesRepository::new(store.clone());

        let series = repo.create(create("Classics", &["b1"])).unwrap();
        let read = store.read().unwrap();
        let publisher = read.require::<Publisher>("pub1").unwrap();
        assert_eq!(publisher.book_series, vec![series.id.clone()]);
        let book = read.require::<Book>("b1").unwrap();
        assert_eq!(book.series.as_deref(), Some(series.id.as_str()));
    }

    #[test]
    fn test_moving_a_book_between_series() {
        let store = DocumentStore::open_in_memory().unwrap();
        seed(&store);
        let repo = BookSeriesRepository::new(store.clone());

        let first = repo.create(create("Classics", &["b1", "b2"])).unwrap();
        let second = repo.create(create("Modern", &["b2"])).unwrap();

        let first = repo.find_by_id(&first.id).unwrap();
        assert_eq!(first.books, vec!["b1".to_string()]);
        let read = store.read().unwrap();
        assert_eq!(
            read.require::<Book>("b2").unwrap().series.as_deref(),
            Some(second.id.as_str())
        );
    }

    #[test]
    fn test_name_unique_per_publisher_and_missing_book() {
        let store = DocumentStore::open_in_memory().unwrap();
        seed(&store);
        let repo = BookSeriesRepository::new(store.clone());
        repo.create(create("Classics", &[])).unwrap();

        let err = repo.create(create("Classics ", &[])).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err = repo.create(create("Other", &["b1", "nope"])).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(store.read().unwrap().require::<Book>("b1").unwrap().series.is_none());
    }

    #[test]
    fn test_delete_clears_books_and_publisher() {
        let store = DocumentStore::open_in_memory().unwrap();
        seed(&store);
        let repo = BookSeriesRepository::new(store.clone());
        let series = repo.create(create("Classics", &["b1"])).unwrap();

        repo.delete(&series.id).unwrap();
        let read = store.read().unwrap();
        assert!(read.require::<Book>("b1").unwrap().series.is_none());
        assert!(read.require::<Publisher>("pub1").unwrap().book_series.is_empty());
        let err = repo.delete(&series.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyRemoved);
    }
}
