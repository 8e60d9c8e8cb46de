use axum::{extract::State, Json};
use bytes::Bytes;

use crate::assets::enrich::enrich_portfolio;
use crate::errors::AppError;
use crate::models::portfolio::{EnrichedPortfolio, Portfolio};
use crate::portfolio::validation::{describe, parse_portfolio};
use crate::state::AppState;

/// GET /api/portfolio
///
/// Returns the stored document with every project's images derived from disk.
pub async fn handle_get_portfolio(
    State(state): State<AppState>,
) -> Result<Json<EnrichedPortfolio>, AppError> {
    let portfolio = state.store.get().await?;
    let enriched = enrich_portfolio(portfolio, &state.config.serving_assets_dir()).await;
    Ok(Json(enriched))
}

/// PUT /api/portfolio
///
/// Replaces the whole document. The body is parsed here rather than through
/// the `Json` extractor so every schema failure maps to 400.
pub async fn handle_put_portfolio(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Portfolio>, AppError> {
    let portfolio = parse_portfolio(&body).map_err(|issues| {
        let message = describe(&issues);
        tracing::info!("Rejected portfolio update: {message}");
        AppError::Validation(message)
    })?;

    let saved = state.store.replace(portfolio).await?;
    Ok(Json(saved))
}
