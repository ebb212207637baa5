//! HTTP API
//!
//! One module per resource noun. Each exposes `router()`, with handlers in
//! a private `handler` module. Authentication happens in the global
//! `require_auth` layer; role checks are layered per route group.

pub mod auth;
pub mod book_series;
pub mod cart;
pub mod contributor;
pub mod delivery;
pub mod health;
pub mod order;
pub mod product;
pub mod product_type;
pub mod publisher;
pub mod review;
pub mod search;
pub mod section;
pub mod upload;
pub mod user;
