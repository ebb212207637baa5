//! Board Game Model (specific product payload)

use serde::{Deserialize, Serialize};

/// Board game entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardGame {
    pub id: String,
    /// Owning product
    pub product: String,
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub min_age: Option<u32>,
    /// Typical play time in minutes
    pub duration: Option<u32>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Board game attributes supplied when creating a board game product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardGameCreate {
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub min_age: Option<u32>,
    pub duration: Option<u32>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub description: Option<String>,
}

/// Update board game payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardGameUpdate {
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub min_age: Option<u32>,
    pub duration: Option<u32>,
    pub languages: Option<Vec<String>>,
    pub description: Option<String>,
}
