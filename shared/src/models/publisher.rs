//! Publisher Model

use serde::{Deserialize, Serialize};

/// Publisher entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub id: String,
    pub name: String,
    /// Books whose `publisher` is this document
    #[serde(default)]
    pub books: Vec<String>,
    /// Series that belong to this publisher
    #[serde(default)]
    pub book_series: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Create publisher payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherCreate {
    pub name: String,
}

/// Update publisher payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublisherUpdate {
    pub name: Option<String>,
}
