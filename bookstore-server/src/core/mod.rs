//! Core: configuration, shared state, server and startup errors
//!
//! - [`Config`]: environment configuration
//! - [`ServerState`]: handles shared by every request
//! - [`Server`]: HTTP listener
//! - [`ServerError`]: startup and serve failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
