//! Delivery Models (country, payment type, delivery type)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Country entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,
    pub name: String,
    pub key: String,
    /// Supported cities; empty means any city
    #[serde(default)]
    pub cities: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryCreate {
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

/// Payment type entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentType {
    pub id: String,
    pub name: String,
    pub key: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTypeCreate {
    pub name: String,
    pub key: String,
}

/// Delivery type entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryType {
    pub id: String,
    pub name: String,
    pub key: String,
    pub price: Decimal,
    pub is_price_variable: bool,
    pub requires_contact_info: bool,
    pub requires_full_address: bool,
    /// Supported country ids
    #[serde(default)]
    pub countries: Vec<String>,
    /// Supported payment type ids
    #[serde(default)]
    pub payment_types: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTypeCreate {
    pub name: String,
    pub key: String,
    pub price: Decimal,
    #[serde(default)]
    pub is_price_variable: bool,
    #[serde(default)]
    pub requires_contact_info: bool,
    #[serde(default)]
    pub requires_full_address: bool,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub payment_types: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTypeUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub is_price_variable: Option<bool>,
    pub requires_contact_info: Option<bool>,
    pub requires_full_address: Option<bool>,
    pub countries: Option<Vec<String>>,
    pub payment_types: Option<Vec<String>>,
}
