//! Local mirror of the asset list.
//!
//! Plays the role of the browser's local storage: the full asset list is
//! written under a fixed path and read back once at startup. It is a
//! warm-start optimization only — the remote store stays the source of truth,
//! and a cache that is absent, malformed, or stale degrades to a cold start.

use std::fs;
use std::path::PathBuf;

use super::library::LibraryAsset;

/// File-backed asset list mirror.
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the mirrored asset list. Missing or malformed content yields an
    /// empty list; corruption is logged, never fatal.
    pub fn load(&self) -> Vec<LibraryAsset> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str(&raw) {
            Ok(assets) => assets,
            Err(err) => {
                tracing::warn!("Discarding malformed asset cache at {:?}: {}", self.path, err);
                Vec::new()
            }
        }
    }

    /// Mirror the asset list to disk. Failures are logged and swallowed; the
    /// in-memory state is never gated on the mirror.
    pub fn store(&self, assets: &[LibraryAsset]) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!("Failed to create cache directory {:?}: {}", parent, err);
                return;
            }
        }

        let json = match serde_json::to_string(assets) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("Failed to serialize asset cache: {}", err);
                return;
            }
        };

        if let Err(err) = fs::write(&self.path, json) {
            tracing::warn!("Failed to write asset cache at {:?}: {}", self.path, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetKind;
    use tempfile::TempDir;

    fn asset(id: &str) -> LibraryAsset {
        LibraryAsset {
            id: id.to_string(),
            name: "Hero Banner".to_string(),
            kind: AssetKind::Image,
            url: "https://cdn.example.com/hero.png".to_string(),
            tags: vec!["banner".to_string()],
            collection: "Marketing".to_string(),
            created: "2024-01-15".to_string(),
            size: "2.4 MB".to_string(),
            favorite: true,
            rating: 5,
            notes: String::new(),
            comments: Vec::new(),
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path().join("assets.json"));

        cache.store(&[asset("a1"), asset("a2")]);
        let loaded = cache.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "a1");
    }

    #[test]
    fn test_missing_file_is_cold_start() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path().join("nope.json"));
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_malformed_content_is_discarded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.json");
        fs::write(&path, "{ not json").unwrap();
        let cache = LocalCache::new(path);
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_store_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path().join("nested/deep/assets.json"));
        cache.store(&[asset("a1")]);
        assert_eq!(cache.load().len(), 1);
    }
}
