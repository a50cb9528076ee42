//! Asset model matching the frontend Asset interface.

use serde::{Deserialize, Serialize};

/// The kind of creative file an asset points at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Document,
    Video,
    Music,
    Archive,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Document => "document",
            AssetKind::Video => "video",
            AssetKind::Music => "music",
            AssetKind::Archive => "archive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "image" => Some(AssetKind::Image),
            "document" => Some(AssetKind::Document),
            "video" => Some(AssetKind::Video),
            "music" => Some(AssetKind::Music),
            "archive" => Some(AssetKind::Archive),
            _ => None,
        }
    }

    /// Guess the kind from a source URL's extension. Unknown extensions fall
    /// back to `Document`.
    pub fn from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        let ext = lower
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('.').next())
            .unwrap_or("");

        match ext {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" => AssetKind::Image,
            "mp4" | "webm" | "mov" | "avi" => AssetKind::Video,
            "mp3" | "wav" | "ogg" | "flac" => AssetKind::Music,
            "zip" | "tar" | "gz" | "rar" | "7z" => AssetKind::Archive,
            _ => AssetKind::Document,
        }
    }
}

/// Normalize a set of user tags: trim, lower-case, drop empties, deduplicate
/// while preserving first-encountered order.
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let normalized = tag.trim().to_lowercase();
        if !normalized.is_empty() && !tags.contains(&normalized) {
            tags.push(normalized);
        }
    }
    tags
}

/// A managed creative file or link with metadata, owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    pub thumbnail_url: String,
    pub file_type: AssetKind,
    pub file_size: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ai_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating a new asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssetRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub file_type: Option<AssetKind>,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub collection_id: Option<String>,
}

/// Query parameters for listing assets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAssetsQuery {
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}
