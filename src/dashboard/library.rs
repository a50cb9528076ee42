//! The stateful asset library behind the dashboard.
//!
//! Owns the asset list, the selection set, and the activity log. Every user
//! gesture maps to one explicit method here; mutations are local and
//! synchronous, and invalid input (unknown id, empty tag) is a silent no-op
//! rather than an error.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{derive_view, library_stats, suggested_tags, DerivedView, LibraryStats, ViewParams};
use crate::models::{normalize_tags, AssetKind};
use crate::tagging::TagSuggester;

/// Collection for assets uploaded without an explicit one.
pub const DEFAULT_COLLECTION: &str = "Uncategorized";

/// Activity log is bounded to the most recent entries.
const ACTIVITY_LIMIT: usize = 10;

const MAX_RATING: i32 = 5;

/// A comment on an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub created: String,
}

/// An asset as the dashboard sees it.
///
/// Invariants: tags are unique and lower-cased; rating stays within 0..=5.
/// Both are restored by [`LibraryAsset::normalized`] on entry into a library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryAsset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub collection: String,
    pub created: String,
    pub size: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl LibraryAsset {
    /// Restore the type invariants on an asset coming from outside the
    /// library (upload, cache, remote fetch).
    pub fn normalized(mut self) -> Self {
        self.tags = normalize_tags(&self.tags);
        self.rating = self.rating.min(MAX_RATING as u8);
        if self.collection.trim().is_empty() {
            self.collection = DEFAULT_COLLECTION.to_string();
        }
        self
    }
}

/// Errors surfaced to the user by library actions.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("select assets first")]
    NothingSelected,
    #[error("failed to serialize selection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The dashboard view-model: asset list, selection set, activity log.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    assets: Vec<LibraryAsset>,
    selection: HashSet<String>,
    user_name: String,
    activity: Vec<String>,
}

impl AssetLibrary {
    /// Create an empty library acting as the given user.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            assets: Vec::new(),
            selection: HashSet::new(),
            user_name: user_name.into(),
            activity: Vec::new(),
        }
    }

    /// Create a library from an existing asset list (e.g. a cache warm-start
    /// or a remote fetch), restoring invariants on each asset.
    pub fn from_assets(user_name: impl Into<String>, assets: Vec<LibraryAsset>) -> Self {
        let mut library = Self::new(user_name);
        library.assets = assets.into_iter().map(LibraryAsset::normalized).collect();
        library
    }

    pub fn assets(&self) -> &[LibraryAsset] {
        &self.assets
    }

    pub fn selection(&self) -> &HashSet<String> {
        &self.selection
    }

    /// Activity log entries, most recent first.
    pub fn activity(&self) -> &[String] {
        &self.activity
    }

    // ==================== DERIVED VIEW ====================

    pub fn view(&self, params: &ViewParams) -> DerivedView {
        derive_view(&self.assets, params)
    }

    pub fn stats(&self) -> LibraryStats {
        library_stats(&self.assets)
    }

    pub fn suggested_tags(&self) -> Vec<String> {
        suggested_tags(&self.assets)
    }

    // ==================== UPLOADS ====================

    /// Prepend newly uploaded assets to the library. Assets without a
    /// collection land in the default bucket.
    pub fn add_assets(&mut self, incoming: Vec<LibraryAsset>) {
        if incoming.is_empty() {
            return;
        }
        let count = incoming.len();
        let mut normalized: Vec<LibraryAsset> =
            incoming.into_iter().map(LibraryAsset::normalized).collect();
        normalized.append(&mut self.assets);
        self.assets = normalized;
        self.log(format!("Uploaded {} assets", count));
    }

    /// Merge a fetched snapshot into the library additively: assets we do
    /// not know yet are appended, assets we already hold keep their local
    /// state. A response arriving after further local mutations therefore
    /// never claws back newer edits.
    pub fn merge_remote(&mut self, fetched: Vec<LibraryAsset>) {
        for asset in fetched {
            if !self.assets.iter().any(|a| a.id == asset.id) {
                self.assets.push(asset.normalized());
            }
        }
    }

    // ==================== PER-ASSET MUTATIONS ====================

    pub fn toggle_favorite(&mut self, id: &str) {
        if let Some(asset) = self.asset_mut(id) {
            asset.favorite = !asset.favorite;
        }
    }

    /// Set an asset's rating, clamped into 0..=5.
    pub fn set_rating(&mut self, id: &str, rating: i32) {
        if let Some(asset) = self.asset_mut(id) {
            asset.rating = rating.clamp(0, MAX_RATING) as u8;
        }
    }

    /// Rename an asset. Empty or whitespace-only input leaves the name
    /// unchanged.
    pub fn rename(&mut self, id: &str, new_name: &str) {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return;
        }
        if let Some(asset) = self.asset_mut(id) {
            asset.name = trimmed.to_string();
            let entry = format!("Renamed asset to {}", trimmed);
            self.log(entry);
        }
    }

    /// Add a tag: trimmed, lower-cased, duplicate-safe; empty input ignored.
    pub fn add_tag(&mut self, id: &str, tag: &str) {
        let normalized = tag.trim().to_lowercase();
        if normalized.is_empty() {
            return;
        }
        if let Some(asset) = self.asset_mut(id) {
            if !asset.tags.contains(&normalized) {
                asset.tags.push(normalized);
            }
        }
    }

    /// Remove an exact tag; no-op if absent.
    pub fn remove_tag(&mut self, id: &str, tag: &str) {
        if let Some(asset) = self.asset_mut(id) {
            asset.tags.retain(|t| t != tag);
        }
    }

    /// Append a comment authored by the acting user; empty input ignored.
    pub fn add_comment(&mut self, id: &str, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let author = self.user_name.clone();
        if let Some(asset) = self.asset_mut(id) {
            asset.comments.push(Comment {
                id: uuid::Uuid::new_v4().to_string(),
                author,
                text: trimmed.to_string(),
                created: Utc::now().to_rfc3339(),
            });
        }
    }

    /// Replace the notes field verbatim; notes may be intentionally blank or
    /// whitespace-formatted.
    pub fn save_notes(&mut self, id: &str, notes: &str) {
        if let Some(asset) = self.asset_mut(id) {
            asset.notes = notes.to_string();
        }
    }

    pub fn move_to_collection(&mut self, id: &str, collection: &str) {
        if let Some(asset) = self.asset_mut(id) {
            asset.collection = collection.to_string();
        }
    }

    /// Delete one asset. Its id is purged from the selection set so no
    /// dangling reference survives.
    pub fn delete(&mut self, id: &str) {
        let before = self.assets.len();
        self.assets.retain(|a| a.id != id);
        self.selection.remove(id);
        if self.assets.len() != before {
            self.log("Deleted asset".to_string());
        }
    }

    /// Merge suggested tags into one asset, keeping existing tags.
    pub fn auto_tag(&mut self, id: &str, suggester: &dyn TagSuggester) {
        if let Some(asset) = self.asset_mut(id) {
            merge_suggestions(asset, suggester);
        }
    }

    /// Merge suggested tags into every asset.
    pub fn auto_tag_all(&mut self, suggester: &dyn TagSuggester) {
        for asset in &mut self.assets {
            merge_suggestions(asset, suggester);
        }
        self.log("Auto-tagging completed".to_string());
    }

    // ==================== SELECTION & BULK ACTIONS ====================

    /// Toggle one id in the selection set.
    pub fn toggle_selection(&mut self, id: &str) {
        if !self.selection.remove(id) {
            self.selection.insert(id.to_string());
        }
    }

    /// Replace the selection set with exactly the given ids (typically the
    /// current page).
    pub fn select_all_visible<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.selection = ids.into_iter().collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Set the favorite flag on every selected asset, then clear the
    /// selection.
    pub fn bulk_favorite(&mut self, favorite: bool) {
        let count = self.selection.len();
        if count == 0 {
            return;
        }
        for asset in &mut self.assets {
            if self.selection.contains(&asset.id) {
                asset.favorite = favorite;
            }
        }
        let verb = if favorite { "Favorited" } else { "Unfavorited" };
        self.log(format!("{} {} assets", verb, count));
        self.selection.clear();
    }

    /// Delete every selected asset, then clear the selection.
    pub fn bulk_delete(&mut self) {
        let count = self.selection.len();
        if count == 0 {
            return;
        }
        self.assets.retain(|a| !self.selection.contains(&a.id));
        self.log(format!("Deleted {} assets", count));
        self.selection.clear();
    }

    /// Export the selected assets as pretty-printed JSON, then clear the
    /// selection. An empty selection is a user error and leaves the selection
    /// untouched.
    pub fn export_selected(&mut self) -> Result<String, LibraryError> {
        if self.selection.is_empty() {
            return Err(LibraryError::NothingSelected);
        }
        let selected: Vec<&LibraryAsset> = self
            .assets
            .iter()
            .filter(|a| self.selection.contains(&a.id))
            .collect();
        let json = serde_json::to_string_pretty(&selected)?;
        self.log("Exported selected assets (JSON)".to_string());
        self.selection.clear();
        Ok(json)
    }

    // ==================== INTERNAL ====================

    fn asset_mut(&mut self, id: &str) -> Option<&mut LibraryAsset> {
        self.assets.iter_mut().find(|a| a.id == id)
    }

    fn log(&mut self, entry: String) {
        self.activity.insert(0, entry);
        self.activity.truncate(ACTIVITY_LIMIT);
    }
}

fn merge_suggestions(asset: &mut LibraryAsset, suggester: &dyn TagSuggester) {
    for tag in suggester.suggest(&asset.name, asset.kind) {
        if !asset.tags.contains(&tag) {
            asset.tags.push(tag);
        }
    }
}
