//! Persistence layer
//!
//! - [`store`]: redb document store, read/write scopes, counters
//! - [`document`]: the [`Document`] trait and collection registry
//! - [`references`]: inverse-side maintenance for denormalized relations
//! - [`soft_delete`]: tombstoning
//! - [`repository`]: per-resource operations

pub mod document;
pub mod query;
pub mod references;
pub mod repository;
pub mod soft_delete;
pub mod store;

pub use document::Document;
pub use soft_delete::soft_delete;
pub use store::{
    DocumentStore, ORDER_NUMBER_COUNTER, PRODUCT_CODE_COUNTER, ReadScope, Scope, StoreError,
    StoreResult, WriteScope,
};
