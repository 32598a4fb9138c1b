use crate::transport::http::handlers::common::with_service;
use crate::transport::http::types::{ApiResponse, AppState, HomeResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service root", body = HomeResponse)
    )
)]
pub async fn home_handler() -> impl IntoResponse {
    Json(HomeResponse {
        msg: "Home".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (data directory writable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (data directory not writable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let probe = with_service(&state, |service| {
        let data_dir = service.data_dir().display().to_string();
        let writable = tempfile::NamedTempFile::new_in(service.data_dir()).map(|_| ());
        Ok((data_dir, service.registry().list_models(), writable))
    })
    .await;

    match probe {
        Ok((data_dir, entities, Ok(()))) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({
                    "status": "ok",
                    "data_dir": data_dir,
                    "entities": entities,
                })),
                error: None,
            }),
        )
            .into_response(),
        Ok((data_dir, _, Err(e))) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                success: false,
                data: Some(serde_json::json!({ "status": "unhealthy", "data_dir": data_dir })),
                error: Some(format!("Data directory not writable: {}", e.kind())),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
