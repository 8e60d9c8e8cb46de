use axum::{extract::State, Json};
use bytes::Bytes;

use crate::contact::relay::{ContactRequest, ContactResponse};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/contact
pub async fn handle_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ContactResponse>, AppError> {
    let request: ContactRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid contact request: {e}")))?;
    let response = state.contact.relay(&request).await?;
    Ok(Json(response))
}
