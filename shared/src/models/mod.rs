//! Data models
//!
//! Documents are stored as camelCase JSON. Ids are UUID strings, timestamps
//! are epoch milliseconds, and `deletedAt` marks a soft-deleted document.

pub mod book;
pub mod book_series;
pub mod board_game;
pub mod cart;
pub mod contributor;
pub mod delivery;
pub mod order;
pub mod product;
pub mod product_type;
pub mod publisher;
pub mod review;
pub mod section;
pub mod user;

// Re-exports
pub use book::*;
pub use book_series::*;
pub use board_game::*;
pub use cart::*;
pub use contributor::*;
pub use delivery::*;
pub use order::*;
pub use product::*;
pub use product_type::*;
pub use publisher::*;
pub use review::*;
pub use section::*;
pub use user::*;
