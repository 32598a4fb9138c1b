use crate::app::record_service::RecordService;
use crate::domain::model::EntityModel;
use crate::error::StoreError;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        match self {
            StoreError::NotFound(message) => {
                tracing::warn!(%message, "not found");
                (StatusCode::NOT_FOUND, Json(ApiResponse::failure(message, None))).into_response()
            }
            StoreError::Validation { message, errors } => {
                tracing::warn!(%message, errors = errors.len(), "validation failed");
                let data = (!errors.is_empty()).then(|| serde_json::json!({ "errors": errors }));
                (StatusCode::BAD_REQUEST, Json(ApiResponse::failure(message, data))).into_response()
            }
            StoreError::StorageIo(detail) => {
                tracing::error!(%detail, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::failure("Storage error", None)),
                )
                    .into_response()
            }
        }
    }
}

/// Resolves the `{entity}` path segment, 404 when no such table is registered.
pub async fn ensure_model_registered(
    state: &AppState,
    entity: &str,
) -> Result<Arc<dyn EntityModel>, StoreError> {
    let service = state.record_service.lock().await;
    service.model(entity.trim().to_lowercase().as_str())
}

/// Runs one store call on the blocking pool while holding the service lock.
/// Table reads, writes and fsyncs never block the async workers.
pub async fn with_service<T, F>(state: &AppState, call: F) -> Result<T, StoreError>
where
    F: FnOnce(&RecordService) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let service = state.record_service.clone().lock_owned().await;
    tokio::task::spawn_blocking(move || call(&service))
        .await
        .map_err(|e| StoreError::storage(format!("store task failed: {}", e)))?
}

pub fn parse_id(raw: &str) -> Result<u64, StoreError> {
    raw.trim().parse::<u64>().map_err(|_| {
        StoreError::validation(format!(
            "Invalid id '{}': expected a non-negative integer",
            raw
        ))
    })
}

/// File download response with a `Content-Disposition: attachment` header.
pub fn attachment(content_type: &'static str, file_name: String, body: impl IntoResponse) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_non_negative_integers() {
        assert_eq!(parse_id("7").unwrap(), 7);
        assert!(matches!(parse_id("-1"), Err(StoreError::Validation { .. })));
        assert!(matches!(parse_id("abc"), Err(StoreError::Validation { .. })));
    }

    #[test]
    fn storage_errors_hide_their_detail() {
        let resp = StoreError::storage("/srv/app/data/cliente.csv: permission denied").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_kinds_map_to_status_codes() {
        assert_eq!(
            StoreError::NotFound("Order 3 not found".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            StoreError::validation("bad").into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
