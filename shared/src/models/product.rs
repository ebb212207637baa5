//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BoardGame, BoardGameCreate, BoardGameUpdate, Book, BookCreate, BookUpdate};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Unique URL slug
    pub key: String,
    /// Unique sequential code
    pub code: u64,
    pub price: Decimal,
    /// Units in stock
    pub quantity: u32,
    /// Product type reference
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Book or board game id, resolved by `type`
    pub specific_product: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// The resolved specific product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SpecificProduct {
    Book(Book),
    BoardGame(BoardGame),
}

/// Product with its specific product resolved
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub details: Option<SpecificProduct>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    /// Derived from `name` when absent
    pub key: Option<String>,
    pub price: Decimal,
    pub quantity: Option<u32>,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Required when the type is `book`
    pub book: Option<BookCreate>,
    /// Required when the type is `board-game`
    pub board_game: Option<BoardGameCreate>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub key: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
    pub sections: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub book: Option<BookUpdate>,
    pub board_game: Option<BoardGameUpdate>,
}
