//! Collection model: a named, user-owned grouping of assets.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed palette used when a collection is created without a color.
pub const COLOR_PALETTE: [&str; 12] = [
    "#667eea", "#764ba2", "#f093fb", "#f5576c", "#4facfe", "#00f2fe", "#43e97b", "#38f9d7",
    "#fa709a", "#fee140", "#a8edea", "#fed6e3",
];

/// Pick a random color from the fixed palette.
pub fn random_palette_color() -> String {
    let idx = rand::rng().random_range(0..COLOR_PALETTE.len());
    COLOR_PALETTE[idx].to_string()
}

/// A named, user-owned grouping of assets. `asset_count` is derived by
/// counting referencing assets, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: String,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub asset_count: i64,
}

/// Request body for creating a new collection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollectionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// Request body for updating an existing collection.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCollectionRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// Query parameters for listing collections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCollectionsQuery {
    #[serde(default)]
    pub public: Option<bool>,
}

/// Query parameters for deleting a collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteCollectionQuery {
    #[serde(default)]
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_color_is_from_palette() {
        for _ in 0..32 {
            let color = random_palette_color();
            assert!(COLOR_PALETTE.contains(&color.as_str()));
        }
    }
}
