use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::contact::mailer::MailerError;
use crate::portfolio::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to save portfolio data: {0}")]
    SaveFailed(String),

    #[error("Email provider rejected the request: {0}")]
    DeliveryRejected(String),

    #[error("Email delivery failed: {0}")]
    Delivery(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => {
                tracing::warn!("{e}");
                AppError::NotFound("Portfolio data not found".to_string())
            }
            StoreError::SaveFailed(_) => AppError::SaveFailed(e.to_string()),
        }
    }
}

impl From<MailerError> for AppError {
    fn from(e: MailerError) -> Self {
        match &e {
            MailerError::NotConfigured(what) => AppError::Configuration(what.clone()),
            // Credential problems are ours, not the visitor's.
            MailerError::Api { status: 401 | 403, .. } => AppError::Delivery(e.to_string()),
            MailerError::Api { status, .. } if (400..500).contains(status) => {
                AppError::DeliveryRejected(e.to_string())
            }
            _ => AppError::Delivery(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "The server is not configured to handle this request".to_string(),
                )
            }
            AppError::SaveFailed(msg) => {
                tracing::error!("Save failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SAVE_FAILED",
                    "Failed to save portfolio data".to_string(),
                )
            }
            AppError::DeliveryRejected(msg) => {
                tracing::warn!("Email provider rejected message: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    "DELIVERY_REJECTED",
                    "The message could not be sent, please check the form and try again"
                        .to_string(),
                )
            }
            AppError::Delivery(msg) => {
                tracing::error!("Email delivery error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DELIVERY_FAILED",
                    "Failed to send message".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "message": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16) -> MailerError {
        MailerError::Api {
            status,
            message: "provider said no".to_string(),
        }
    }

    #[test]
    fn test_provider_auth_failures_are_internal() {
        assert!(matches!(AppError::from(api_error(401)), AppError::Delivery(_)));
        assert!(matches!(AppError::from(api_error(403)), AppError::Delivery(_)));
    }

    #[test]
    fn test_provider_client_errors_are_bad_requests() {
        assert!(matches!(
            AppError::from(api_error(400)),
            AppError::DeliveryRejected(_)
        ));
        assert!(matches!(
            AppError::from(api_error(413)),
            AppError::DeliveryRejected(_)
        ));
    }

    #[test]
    fn test_provider_server_errors_are_internal() {
        assert!(matches!(AppError::from(api_error(502)), AppError::Delivery(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Configuration("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::DeliveryRejected("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::SaveFailed("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_provider_detail_is_not_leaked() {
        let response = AppError::from(api_error(401)).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!body.contains("provider said no"));
    }
}
