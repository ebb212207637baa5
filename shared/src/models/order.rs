//! Order Models
//!
//! An order is a frozen snapshot: its contact, receiver, company and
//! delivery records are fresh documents owned by that order alone, and
//! its items copy the product fields at the time of purchase.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CartItemRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfoInput {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
}

/// Contact or receiver record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInput {
    pub name: String,
    pub identification_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub identification_number: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInput {
    pub delivery_type: String,
    pub country: String,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub flat: Option<String>,
    pub post_office: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: String,
    pub delivery_type: String,
    pub country: String,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub flat: Option<String>,
    pub post_office: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusKey {
    New,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatusKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatus {
    pub name: String,
    pub key: OrderStatusKey,
}

impl From<OrderStatusKey> for OrderStatus {
    fn from(key: OrderStatusKey) -> Self {
        Self {
            name: key.name().to_string(),
            key,
        }
    }
}

/// Product snapshot at purchase time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: String,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub quantity: u32,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Sequential, unique
    pub number: u64,
    pub user: String,
    pub contact_info: String,
    pub receiver: Option<String>,
    pub company: Option<String>,
    pub delivery: String,
    pub payment_type: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub total_price: Decimal,
    pub comment: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub contact_info: ContactInfoInput,
    pub receiver: Option<ContactInfoInput>,
    pub company: Option<CompanyInput>,
    pub delivery: DeliveryInput,
    pub payment_type: String,
    /// Required for guests; signed-in users default to their cart
    pub items: Option<Vec<CartItemRequest>>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatusKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices_serialize_as_numbers() {
        let item = OrderItem {
            product: "p1".to_string(),
            name: "Dune".to_string(),
            price: Decimal::new(1250, 2),
            image: None,
            quantity: 2,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["price"].as_f64(), Some(12.5));

        let back: OrderItem = serde_json::from_value(json).unwrap();
        assert_eq!(back.price, Decimal::new(1250, 2));
    }

    #[test]
    fn test_price_accepts_json_number_input() {
        let item: OrderItem = serde_json::from_str(
            r#"{"product":"p1","name":"Dune","price":19.99,"image":null,"quantity":1}"#,
        )
        .unwrap();
        assert_eq!(item.price, Decimal::new(1999, 2));
    }
}
