//! Shared types for the bookstore backend
//!
//! Domain documents, request payloads, listing queries and the unified
//! error system used by the server and its clients.

pub mod error;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
