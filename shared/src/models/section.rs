//! Section Model

use serde::{Deserialize, Serialize};

use super::Product;
use crate::util::double_option;

/// Section entity (catalog tree node)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    /// Child sections
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Section with its products resolved (`?withProducts=true`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionWithProducts {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    pub sections: Vec<String>,
    pub products: Vec<Product>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SectionWithProducts {
    pub fn new(section: Section, products: Vec<Product>) -> Self {
        Self {
            id: section.id,
            name: section.name,
            parent: section.parent,
            sections: section.sections,
            products,
            created_at: section.created_at,
            updated_at: section.updated_at,
        }
    }
}

/// Create section payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionCreate {
    pub name: String,
    pub parent: Option<String>,
    #[serde(default)]
    pub products: Vec<String>,
}

/// Update section payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionUpdate {
    pub name: Option<String>,
    /// `null` detaches the section from its parent
    #[serde(default, deserialize_with = "double_option")]
    pub parent: Option<Option<String>>,
    pub products: Option<Vec<String>>,
}
