//! Dashboard view-model for the asset library.
//!
//! This is the client-side core of the application: a pure
//! filter/sort/paginate engine ([`derive_view`]), derived metrics, and the
//! stateful [`library::AssetLibrary`] holding the asset list and the
//! selection set. None of it talks to the network; persistence sync is a
//! fire-and-forget concern of the callers.

pub mod cache;
pub mod library;

pub use library::{AssetLibrary, Comment, LibraryAsset, LibraryError};

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::AssetKind;

/// How many suggested tags the dashboard shows.
pub const SUGGESTED_TAG_LIMIT: usize = 6;

/// Sort key for the asset grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Date,
    Size,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

/// Type filter, including the "all" wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Kind(AssetKind),
}

impl TypeFilter {
    fn matches(&self, kind: AssetKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Kind(wanted) => *wanted == kind,
        }
    }
}

/// Ephemeral filter/sort/pagination parameters. Not persisted server-side.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewParams {
    pub search: String,
    pub type_filter: TypeFilter,
    pub favorites_only: bool,
    pub collection: Option<String>,
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
    /// 1-based page number; clamped into the valid range when deriving
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            type_filter: TypeFilter::All,
            favorites_only: false,
            collection: None,
            sort_key: SortKey::Date,
            sort_dir: SortDir::Desc,
            page: 1,
            page_size: 8,
        }
    }
}

/// The displayed slice of the library under the current parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    pub page: Vec<LibraryAsset>,
    pub total_pages: usize,
    pub total_matches: usize,
}

/// Derive the displayed page from the full asset set and the current
/// parameters. Pure function of its two inputs.
pub fn derive_view(assets: &[LibraryAsset], params: &ViewParams) -> DerivedView {
    let mut matches: Vec<&LibraryAsset> = assets
        .iter()
        .filter(|asset| matches_filters(asset, params))
        .collect();

    // Stable ascending sort, then reverse the whole result for descending.
    // Reversing preserves the relative order of ties under either direction;
    // an independent descending comparator would not.
    matches.sort_by(|a, b| compare_assets(a, b, params.sort_key));
    if params.sort_dir == SortDir::Desc {
        matches.reverse();
    }

    let page_size = params.page_size.max(1);
    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(page_size).max(1);
    let page = params.page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_matches);
    let page_assets = if start < total_matches {
        matches[start..end].iter().map(|a| (*a).clone()).collect()
    } else {
        Vec::new()
    };

    DerivedView {
        page: page_assets,
        total_pages,
        total_matches,
    }
}

/// Conjunctive filter predicate.
fn matches_filters(asset: &LibraryAsset, params: &ViewParams) -> bool {
    if let Some(collection) = &params.collection {
        if &asset.collection != collection {
            return false;
        }
    }
    if !params.search.is_empty() {
        let needle = params.search.to_lowercase();
        let in_name = asset.name.to_lowercase().contains(&needle);
        let in_tags = asset.tags.iter().any(|t| t.contains(&needle));
        if !in_name && !in_tags {
            return false;
        }
    }
    if !params.type_filter.matches(asset.kind) {
        return false;
    }
    if params.favorites_only && !asset.favorite {
        return false;
    }
    true
}

fn compare_assets(a: &LibraryAsset, b: &LibraryAsset, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        SortKey::Size => parse_size_bytes(&a.size)
            .partial_cmp(&parse_size_bytes(&b.size))
            .unwrap_or(Ordering::Equal),
        SortKey::Date => parse_created_ts(&a.created).cmp(&parse_created_ts(&b.created)),
    }
}

/// Normalize a display size string to bytes. Unit suffixes KB/MB/GB are each
/// 1024x the previous; a missing or unrecognized suffix means raw bytes.
pub fn parse_size_bytes(size: &str) -> f64 {
    let trimmed = size.trim();
    let unit_start = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(unit_start);
    let magnitude: f64 = number.trim().parse().unwrap_or(0.0);

    match unit.trim().to_ascii_uppercase().as_str() {
        "KB" => magnitude * 1024.0,
        "MB" => magnitude * 1024.0 * 1024.0,
        "GB" => magnitude * 1024.0 * 1024.0 * 1024.0,
        _ => magnitude,
    }
}

/// Parse a creation date for sorting. Accepts RFC 3339 timestamps and plain
/// `YYYY-MM-DD` dates; anything else sorts first.
pub fn parse_created_ts(created: &str) -> i64 {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(created) {
        return dt.timestamp();
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(created, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return dt.and_utc().timestamp();
        }
    }
    0
}

/// Aggregate counts over the full (unfiltered) asset set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryStats {
    pub total: usize,
    pub favorites: usize,
    pub recent: usize,
    pub distinct_tags: usize,
}

/// Compute library stats over the full set, independent of filtering.
pub fn library_stats(assets: &[LibraryAsset]) -> LibraryStats {
    let mut distinct: Vec<&str> = Vec::new();
    for asset in assets {
        for tag in &asset.tags {
            if !distinct.contains(&tag.as_str()) {
                distinct.push(tag);
            }
        }
    }

    LibraryStats {
        total: assets.len(),
        favorites: assets.iter().filter(|a| a.favorite).count(),
        recent: assets.len(),
        distinct_tags: distinct.len(),
    }
}

/// Top tags by descending frequency, ties broken by first-encountered order.
pub fn suggested_tags(assets: &[LibraryAsset]) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for asset in assets {
        for tag in &asset.tags {
            match counts.iter_mut().find(|(name, _)| name == tag) {
                Some((_, count)) => *count += 1,
                None => counts.push((tag.clone(), 1)),
            }
        }
    }
    // Stable sort keeps first-encountered order for equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(SUGGESTED_TAG_LIMIT)
        .map(|(tag, _)| tag)
        .collect()
}
