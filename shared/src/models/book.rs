//! Book Model (specific product payload)

use serde::{Deserialize, Serialize};

use crate::util::{double_option, now_millis};

/// Book entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    /// Owning product
    pub product: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub compilers: Vec<String>,
    #[serde(default)]
    pub translators: Vec<String>,
    #[serde(default)]
    pub illustrators: Vec<String>,
    #[serde(default)]
    pub editors: Vec<String>,
    pub publisher: Option<String>,
    pub series: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub isbn: Option<String>,
    pub pages: Option<u32>,
    pub year: Option<i32>,
    pub cover_type: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

impl Book {
    /// Empty book attached to `product`
    pub fn new(id: String, product: String) -> Self {
        let now = now_millis();
        Self {
            id,
            product,
            authors: Vec::new(),
            compilers: Vec::new(),
            translators: Vec::new(),
            illustrators: Vec::new(),
            editors: Vec::new(),
            publisher: None,
            series: None,
            languages: Vec::new(),
            isbn: None,
            pages: None,
            year: None,
            cover_type: None,
            description: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Book attributes supplied when creating a book product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreate {
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub compilers: Vec<String>,
    #[serde(default)]
    pub translators: Vec<String>,
    #[serde(default)]
    pub illustrators: Vec<String>,
    #[serde(default)]
    pub editors: Vec<String>,
    pub publisher: Option<String>,
    pub series: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub isbn: Option<String>,
    pub pages: Option<u32>,
    pub year: Option<i32>,
    pub cover_type: Option<String>,
    pub description: Option<String>,
}

/// Update book payload; every relation list given replaces the old one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    pub authors: Option<Vec<String>>,
    pub compilers: Option<Vec<String>>,
    pub translators: Option<Vec<String>>,
    pub illustrators: Option<Vec<String>>,
    pub editors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub publisher: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub series: Option<Option<String>>,
    pub languages: Option<Vec<String>>,
    pub isbn: Option<String>,
    pub pages: Option<u32>,
    pub year: Option<i32>,
    pub cover_type: Option<String>,
    pub description: Option<String>,
}
