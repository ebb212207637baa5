//! Catalog search
//!
//! Case-insensitive substring match over product names, the names of a
//! book's contributors and its publisher. Results are products, newest first.

use std::collections::HashSet;

use shared::error::AppResult;
use shared::models::{
    Author, Book, Compiler, Editor, Illustrator, Product, Publisher, Translator,
};
use shared::query::SearchQuery;

use crate::db::{DocumentStore, ReadScope, Scope};

#[derive(Clone)]
pub struct SearchRepository {
    store: DocumentStore,
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Ids of books reached through contributors or publishers matching `needle`
fn matching_books(scope: &ReadScope, needle: &str) -> AppResult<HashSet<String>> {
    let mut books = HashSet::new();
    let mut collect = |ids: &[String]| books.extend(ids.iter().cloned());

    for a in scope.filter::<Author>(|c| contains(&c.full_name, needle))? {
        collect(&a.books);
    }
    for c in scope.filter::<Compiler>(|c| contains(&c.full_name, needle))? {
        collect(&c.books);
    }
    for t in scope.filter::<Translator>(|c| contains(&c.full_name, needle))? {
        collect(&t.books);
    }
    for i in scope.filter::<Illustrator>(|c| contains(&c.full_name, needle))? {
        collect(&i.books);
    }
    for e in scope.filter::<Editor>(|c| contains(&c.full_name, needle))? {
        collect(&e.books);
    }
    for p in scope.filter::<Publisher>(|p| contains(&p.name, needle))? {
        collect(&p.books);
    }
    Ok(books)
}

impl SearchRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn search(&self, query: &SearchQuery) -> AppResult<Vec<Product>> {
        let needle = query.query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let scope = self.store.read()?;
        let books = matching_books(&scope, &needle)?;
        let via_books: HashSet<String> = books
            .iter()
            .filter_map(|id| scope.find::<Book>(id).transpose())
            .map(|book| book.map(|b| b.product))
            .collect::<Result<_, _>>()?;

        let mut products = scope.filter::<Product>(|p| {
            contains(&p.name, &needle) || via_books.contains(&p.id)
        })?;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(products
            .into_iter()
            .skip(query.offset)
            .take(query.limit())
            .collect())
    }
}
