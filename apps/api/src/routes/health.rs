use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub data_file_present: bool,
    pub email_configured: bool,
}

/// GET /health
/// Liveness plus the two things a deploy most often gets wrong: the data file
/// and the email settings.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        service: "portfolio-api",
        data_file_present: state.store.path().is_file(),
        email_configured: state.config.email.missing_required().is_empty(),
    })
}
