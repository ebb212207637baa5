//! Product Type Model

use serde::{Deserialize, Serialize};

/// Which specific-product payload a product carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductKind {
    Book,
    BoardGame,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::BoardGame => "board-game",
        }
    }
}

/// Product type entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: String,
    pub name: String,
    pub key: ProductKind,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Create product type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTypeCreate {
    pub name: String,
    pub key: ProductKind,
}
