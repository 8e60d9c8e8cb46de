pub mod health;
pub mod static_files;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::assets::handlers as assets;
use crate::contact::handlers as contact;
use crate::portfolio::handlers as portfolio;
use crate::state::AppState;

/// API routes plus the image asset mounts. The client bundle is added
/// separately by `static_files::mount_client`.
pub fn build_router(state: AppState) -> Router {
    let project_assets = ServeDir::new(state.config.serving_assets_dir());
    let personal_assets = ServeDir::new(&state.config.personal_assets_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/portfolio",
            get(portfolio::handle_get_portfolio).put(portfolio::handle_put_portfolio),
        )
        .route("/api/assets/:folder", get(assets::handle_list_assets))
        .route("/api/contact", post(contact::handle_contact))
        .nest_service("/project_assets", project_assets)
        .nest_service("/personal_assets", personal_assets)
        .with_state(state)
}
