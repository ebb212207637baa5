//! Cart Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// Cart entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub user: String,
    /// Cart item references in insertion order
    #[serde(default)]
    pub items: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Cart item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub cart: String,
    pub product: String,
    /// Always >= 1 while active
    pub quantity: u32,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// `{product, quantity?}` used by add, remove and merge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemRequest {
    pub product: String,
    pub quantity: Option<u32>,
}

impl CartItemRequest {
    /// Quantity with the default of one
    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }
}

/// Merge payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartMergeRequest {
    #[serde(default)]
    pub items: Vec<CartItemRequest>,
}

/// A populated cart line
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub product: Product,
    pub quantity: u32,
    pub subtotal: Decimal,
}

/// Populated cart with totals recomputed on read
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: String,
    pub user: String,
    pub items: Vec<CartLine>,
    pub total_price: Decimal,
    pub total_quantity: u32,
}
