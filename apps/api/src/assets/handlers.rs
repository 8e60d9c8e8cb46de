use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::assets::discovery::{filter_originals, read_image_dir};
use crate::assets::srcset::{responsive_images, ResponsiveImage};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AssetListResponse {
    pub folder: String,
    pub images: Vec<ResponsiveImage>,
    pub count: usize,
}

/// GET /api/assets/:folder
///
/// Lists the original images of one asset folder with their srcsets.
pub async fn handle_list_assets(
    State(state): State<AppState>,
    Path(folder): Path<String>,
) -> Result<Json<AssetListResponse>, AppError> {
    let root = state.config.serving_assets_dir();
    let listing = read_image_dir(&root, &folder).await.map_err(|e| {
        tracing::warn!("Failed to read asset folder {folder}: {e}");
        AppError::NotFound(format!("Asset folder '{folder}' not found"))
    })?;

    let originals = filter_originals(&listing);
    let images = responsive_images(&folder, &originals, &listing);

    Ok(Json(AssetListResponse {
        count: images.len(),
        folder,
        images,
    }))
}
