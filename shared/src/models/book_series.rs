//! Book Series Model

use serde::{Deserialize, Serialize};

/// Book series entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSeries {
    pub id: String,
    pub name: String,
    /// Owning publisher
    pub publisher: String,
    #[serde(default)]
    pub books: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Create book series payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSeriesCreate {
    pub name: String,
    pub publisher: String,
    #[serde(default)]
    pub books: Vec<String>,
}

/// Update book series payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookSeriesUpdate {
    pub name: Option<String>,
    pub books: Option<Vec<String>>,
}
