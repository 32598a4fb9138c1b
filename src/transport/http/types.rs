use crate::app::record_service::RecordService;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;

/// One store call runs at a time: every table read-modify-write cycle is serialized.
#[derive(Clone)]
pub struct AppState {
    pub record_service: Arc<Mutex<RecordService>>,
}

impl AppState {
    pub fn new(record_service: RecordService) -> Self {
        Self {
            record_service: Arc::new(Mutex::new(record_service)),
        }
    }
}

/// Envelope for error responses and the health check.
#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn failure(error: impl Into<String>, data: Option<JsonValue>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }
}

/// Result of a create, update or delete.
#[derive(Serialize, Debug, ToSchema)]
pub struct MutationResponse {
    pub id: u64,
    pub message: String,
    /// The stored record (absent for deletes).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub record: Option<JsonValue>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CountResponse {
    pub quantidade: usize,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct DigestResponse {
    /// Lowercase hex SHA-256 of the table file.
    pub hash_sha256: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HomeResponse {
    pub msg: String,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::failure(
            format!("Invalid JSON body: {} (expected: {})", err, expected),
            None,
        )),
    )
}
