//! Database repository for CRUD operations.
//!
//! All queries are scoped by the calling user's id; mutations on records the
//! caller does not own fail with `Forbidden`.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    normalize_tags, random_palette_color, Asset, AssetKind, Collection, CreateAssetRequest,
    CreateCollectionRequest, ListAssetsQuery, UpdateCollectionRequest,
};

/// Default page size for asset listings.
const DEFAULT_LIMIT: i64 = 50;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== ASSET OPERATIONS ====================

    /// List a user's assets, newest first, with optional collection and
    /// search filters plus offset/limit pagination.
    pub async fn list_assets(
        &self,
        user_id: &str,
        query: &ListAssetsQuery,
    ) -> Result<Vec<Asset>, AppError> {
        let mut sql = String::from(
            "SELECT id, user_id, title, description, url, thumbnail_url, file_type, file_size, \
             tags, ai_tags, collection_id, created_at, updated_at \
             FROM assets WHERE user_id = ?",
        );
        if query.collection_id.is_some() {
            sql.push_str(" AND collection_id = ?");
        }
        if query.search.is_some() {
            // Matched against title and tags, case-insensitive
            sql.push_str(" AND (title LIKE ? OR tags LIKE ?)");
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
        let offset = query.offset.unwrap_or(0).max(0);

        let mut q = sqlx::query(&sql).bind(user_id);
        if let Some(collection_id) = &query.collection_id {
            q = q.bind(collection_id);
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            q = q.bind(pattern.clone()).bind(pattern);
        }
        let rows = q.bind(limit).bind(offset).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(asset_from_row).collect())
    }

    /// Create a new asset with suggested tags and a thumbnail reference.
    pub async fn create_asset(
        &self,
        user_id: &str,
        request: &CreateAssetRequest,
        file_type: AssetKind,
        ai_tags: &[String],
    ) -> Result<Asset, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let tags = normalize_tags(request.tags.as_deref().unwrap_or_default());
        let tags_json = serde_json::to_string(&tags)?;
        let ai_tags_json = serde_json::to_string(ai_tags)?;
        // Thumbnailing is not a real pipeline here; the source url stands in
        let thumbnail_url = request.url.clone();
        let file_size = request.file_size.unwrap_or(0).max(0);

        sqlx::query(
            "INSERT INTO assets (id, user_id, title, description, url, thumbnail_url, file_type, \
             file_size, tags, ai_tags, collection_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.url)
        .bind(&thumbnail_url)
        .bind(file_type.as_str())
        .bind(file_size)
        .bind(&tags_json)
        .bind(&ai_tags_json)
        .bind(&request.collection_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Asset {
            id,
            user_id: user_id.to_string(),
            title: request.title.clone(),
            description: request.description.clone(),
            url: request.url.clone(),
            thumbnail_url,
            file_type,
            file_size,
            tags,
            ai_tags: ai_tags.to_vec(),
            collection_id: request.collection_id.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    // ==================== COLLECTION OPERATIONS ====================

    /// List a user's collections, newest first, each with its live asset
    /// count.
    pub async fn list_collections(
        &self,
        user_id: &str,
        public_only: bool,
    ) -> Result<Vec<Collection>, AppError> {
        let mut sql = String::from(
            "SELECT id, user_id, name, description, color, is_public, created_at, updated_at, \
             (SELECT COUNT(*) FROM assets WHERE assets.collection_id = collections.id) AS asset_count \
             FROM collections WHERE user_id = ?",
        );
        if public_only {
            sql.push_str(" AND is_public = 1");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let rows = sqlx::query(&sql).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(collection_from_row).collect())
    }

    /// Get a collection by ID (unscoped; callers check ownership).
    pub async fn get_collection(&self, id: &str) -> Result<Option<Collection>, AppError> {
        let row = sqlx::query(
            "SELECT id, user_id, name, description, color, is_public, created_at, updated_at, \
             (SELECT COUNT(*) FROM assets WHERE assets.collection_id = collections.id) AS asset_count \
             FROM collections WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(collection_from_row))
    }

    /// Create a new collection. Falls back to a random palette color.
    pub async fn create_collection(
        &self,
        user_id: &str,
        request: &CreateCollectionRequest,
    ) -> Result<Collection, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let color = request
            .color
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(random_palette_color);
        let is_public = request.is_public.unwrap_or(false);

        sqlx::query(
            "INSERT INTO collections (id, user_id, name, description, color, is_public, \
             created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&color)
        .bind(is_public as i32)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Collection {
            id,
            user_id: user_id.to_string(),
            name: request.name.clone(),
            description: request.description.clone(),
            color,
            is_public,
            created_at: now.clone(),
            updated_at: now,
            asset_count: 0,
        })
    }

    /// Update a collection after verifying ownership.
    pub async fn update_collection(
        &self,
        user_id: &str,
        id: &str,
        request: &UpdateCollectionRequest,
    ) -> Result<Collection, AppError> {
        let existing = self
            .get_collection(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Collection {} not found", id)))?;

        if existing.user_id != user_id {
            return Err(AppError::Forbidden(
                "You do not own this collection".to_string(),
            ));
        }

        let now = Utc::now().to_rfc3339();
        let name = request.name.as_ref().unwrap_or(&existing.name);
        let description = request.description.clone().or(existing.description.clone());
        let color = request.color.clone().unwrap_or(existing.color.clone());
        let is_public = request.is_public.unwrap_or(existing.is_public);

        sqlx::query(
            "UPDATE collections SET name = ?, description = ?, color = ?, is_public = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(name)
        .bind(&description)
        .bind(&color)
        .bind(is_public as i32)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Collection {
            id: id.to_string(),
            user_id: existing.user_id,
            name: name.clone(),
            description,
            color,
            is_public,
            created_at: existing.created_at,
            updated_at: now,
            asset_count: existing.asset_count,
        })
    }

    /// Delete a collection after verifying ownership. Member assets are
    /// cascade-deleted first, in the same transaction.
    pub async fn delete_collection(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        let existing = self
            .get_collection(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Collection {} not found", id)))?;

        if existing.user_id != user_id {
            return Err(AppError::Forbidden(
                "You do not own this collection".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM assets WHERE collection_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM collections WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

// Helper functions for row conversion

fn asset_from_row(row: &sqlx::sqlite::SqliteRow) -> Asset {
    let file_type: String = row.get("file_type");
    let tags_str: Option<String> = row.get("tags");
    let ai_tags_str: Option<String> = row.get("ai_tags");

    Asset {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        url: row.get("url"),
        thumbnail_url: row.get("thumbnail_url"),
        file_type: AssetKind::from_str(&file_type).unwrap_or(AssetKind::Document),
        file_size: row.get("file_size"),
        tags: tags_str.map(|s| parse_json_array(&s)).unwrap_or_default(),
        ai_tags: ai_tags_str.map(|s| parse_json_array(&s)).unwrap_or_default(),
        collection_id: row.get("collection_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn collection_from_row(row: &sqlx::sqlite::SqliteRow) -> Collection {
    let is_public: i32 = row.get("is_public");
    Collection {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        color: row.get("color"),
        is_public: is_public != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        asset_count: row.get("asset_count"),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
