use crate::error::StoreError;
use crate::transport::http::handlers::common::{attachment, ensure_model_registered, with_service};
use crate::transport::http::types::{ApiResponse, AppState, DigestResponse};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    get,
    path = "/{entity}/get_zip",
    params(
        ("entity" = String, Path, description = "Entity name (cardapio, cliente, pedido)")
    ),
    responses(
        (status = 200, description = "Zip archive holding the table file", content_type = "application/zip"),
        (status = 404, description = "Unknown entity", body = ApiResponse),
        (status = 500, description = "Storage error", body = ApiResponse)
    )
)]
pub async fn zip_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Response, StoreError> {
    let model = ensure_model_registered(&state, &entity).await?;
    let target = model.clone();
    let bytes = with_service(&state, move |s| s.export_archive(target.as_ref())).await?;
    Ok(attachment(
        "application/zip",
        format!("{}.zip", model.table_name()),
        bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/{entity}/get_sha256",
    params(
        ("entity" = String, Path, description = "Entity name (cardapio, cliente, pedido)")
    ),
    responses(
        (status = 200, description = "SHA-256 of the table file", body = DigestResponse),
        (status = 404, description = "Unknown entity", body = ApiResponse),
        (status = 500, description = "Storage error", body = ApiResponse)
    )
)]
pub async fn sha256_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Response, StoreError> {
    let model = ensure_model_registered(&state, &entity).await?;
    let hash_sha256 = with_service(&state, move |s| s.export_digest(model.as_ref())).await?;
    Ok(Json(DigestResponse { hash_sha256 }).into_response())
}

#[utoipa::path(
    get,
    path = "/{entity}/get_xml",
    params(
        ("entity" = String, Path, description = "Entity name (cardapio, cliente, pedido)")
    ),
    responses(
        (status = 200, description = "XML rendering of the table file", content_type = "application/xml"),
        (status = 404, description = "Unknown entity", body = ApiResponse),
        (status = 500, description = "Storage error", body = ApiResponse)
    )
)]
pub async fn xml_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Response, StoreError> {
    let model = ensure_model_registered(&state, &entity).await?;
    let target = model.clone();
    let document = with_service(&state, move |s| s.export_document(target.as_ref())).await?;
    Ok(attachment(
        "application/xml",
        format!("{}.xml", model.table_name()),
        document,
    ))
}
