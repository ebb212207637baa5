//! Listing and search query parameters

use serde::Deserialize;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// `?limit=&offset=&orderBy=&order=&withProducts=` on list endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_order_by")]
    pub order_by: String,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub with_products: bool,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_order_by() -> String {
    "createdAt".to_string()
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            order_by: default_order_by(),
            order: SortOrder::default(),
            with_products: false,
        }
    }
}

impl ListQuery {
    /// Limit clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

/// `GET /search?query=`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl SearchQuery {
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }
}
