//! Asset API endpoints.

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use super::{success, ApiResult};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{Asset, CreateAssetRequest, ListAssetsQuery};
use crate::AppState;

/// GET /api/assets - List the caller's assets, newest first.
pub async fn list_assets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListAssetsQuery>,
) -> ApiResult<Vec<Asset>> {
    let assets = state.repo.list_assets(&user.id, &query).await?;
    success(assets)
}

/// POST /api/assets - Create an asset from an upload or a linked URL.
pub async fn create_asset(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateAssetRequest>,
) -> ApiResult<Asset> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if request.url.trim().is_empty() {
        return Err(AppError::Validation("URL is required".to_string()));
    }

    let file_type = request
        .file_type
        .unwrap_or_else(|| crate::models::AssetKind::from_url(&request.url));
    let ai_tags = state.suggester.suggest(&request.title, file_type);

    let asset = state
        .repo
        .create_asset(&user.id, &request, file_type, &ai_tags)
        .await?;

    tracing::debug!("Created asset {} for user {}", asset.id, user.id);
    success(asset)
}
