//! Repository Module
//!
//! One repository per resource. Each mutating method opens a single write
//! scope, so existence checks, inverse-side updates and the document write
//! commit together or not at all.

// Catalog
pub mod book_series;
pub mod contributor;
pub mod product;
pub mod product_type;
pub mod publisher;
pub mod review;
pub mod search;
pub mod section;

// Accounts and checkout
pub mod cart;
pub mod delivery;
pub mod order;
pub mod user;

// Re-exports
pub use book_series::BookSeriesRepository;
pub use cart::CartRepository;
pub use contributor::ContributorRepository;
pub use delivery::DeliveryRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use product_type::ProductTypeRepository;
pub use publisher::PublisherRepository;
pub use review::ReviewRepository;
pub use search::SearchRepository;
pub use section::SectionRepository;
pub use user::UserRepository;

use shared::error::{AppError, AppResult};
use shared::models::{BookSeries, Contributor, ContributorRole, Product, Publisher, Section};

use super::document::Document;
use super::store::Scope;

/// Equality of unique names, ignoring surrounding whitespace
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

/// Fail with 409 if an active document other than `except` matches `pred`
pub(crate) fn ensure_unique<T: Document>(
    scope: &impl Scope,
    except: Option<&str>,
    pred: impl Fn(&T) -> bool,
    conflict: impl FnOnce() -> AppError,
) -> AppResult<()> {
    let taken = scope.find_by::<T>(|doc| except != Some(doc.id()) && pred(doc))?;
    match taken {
        Some(_) => Err(conflict()),
        None => Ok(()),
    }
}

/// Load a document for deletion: tombstoned ones resolve so that
/// [`soft_delete`](super::soft_delete) can report them as already removed
pub(crate) fn require_existing<T: Document>(scope: &impl Scope, id: &str) -> AppResult<T> {
    scope
        .find_any::<T>(id)?
        .ok_or_else(|| AppError::not_found(T::LABEL, id))
}

// Inverse-side accessors, passed to the reference maintainer.

pub(crate) fn contributor_books<R: ContributorRole>(c: &mut Contributor<R>) -> &mut Vec<String> {
    &mut c.books
}

pub(crate) fn publisher_books(p: &mut Publisher) -> &mut Vec<String> {
    &mut p.books
}

pub(crate) fn publisher_series(p: &mut Publisher) -> &mut Vec<String> {
    &mut p.book_series
}

pub(crate) fn series_books(s: &mut BookSeries) -> &mut Vec<String> {
    &mut s.books
}

pub(crate) fn section_products(s: &mut Section) -> &mut Vec<String> {
    &mut s.products
}

pub(crate) fn section_children(s: &mut Section) -> &mut Vec<String> {
    &mut s.sections
}

pub(crate) fn product_sections(p: &mut Product) -> &mut Vec<String> {
    &mut p.sections
}
