//! Collection API endpoints.

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use super::{success, ApiResult};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{
    Collection, CreateCollectionRequest, DeleteCollectionQuery, ListCollectionsQuery,
    UpdateCollectionRequest,
};
use crate::AppState;

/// GET /api/collections - List the caller's collections with live asset
/// counts.
pub async fn list_collections(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListCollectionsQuery>,
) -> ApiResult<Vec<Collection>> {
    let public_only = query.public.unwrap_or(false);
    let collections = state.repo.list_collections(&user.id, public_only).await?;
    success(collections)
}

/// POST /api/collections - Create a collection.
pub async fn create_collection(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateCollectionRequest>,
) -> ApiResult<Collection> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let collection = state.repo.create_collection(&user.id, &request).await?;
    success(collection)
}

/// PUT /api/collections - Update a collection after an ownership check.
pub async fn update_collection(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateCollectionRequest>,
) -> ApiResult<Collection> {
    let id = request
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Collection ID required".to_string()))?;

    let collection = state.repo.update_collection(&user.id, &id, &request).await?;
    success(collection)
}

/// DELETE /api/collections?id= - Cascade-delete member assets, then the
/// collection, after an ownership check.
pub async fn delete_collection(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DeleteCollectionQuery>,
) -> ApiResult<()> {
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Collection ID required".to_string()))?;

    state.repo.delete_collection(&user.id, &id).await?;
    tracing::debug!("Deleted collection {} for user {}", id, user.id);
    success(())
}
