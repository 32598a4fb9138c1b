use crate::domain::filter::{Filter, Pagination, LIMIT_PARAM, PAGE_PARAM};
use crate::domain::model::record_id;
use crate::error::StoreError;
use crate::transport::http::handlers::common::{ensure_model_registered, parse_id, with_service};
use crate::transport::http::types::{json_422, ApiResponse, AppState, CountResponse, MutationResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/{entity}/",
    params(
        ("entity" = String, Path, description = "Entity name (cardapio, cliente, pedido)"),
        ("page" = Option<usize>, Query, description = "1-based page, requires limit"),
        ("limit" = Option<usize>, Query, description = "Page size (1..=100)")
    ),
    responses(
        (status = 200, description = "Records matching every field filter, in file order"),
        (status = 400, description = "Invalid pagination", body = ApiResponse),
        (status = 404, description = "Unknown entity", body = ApiResponse),
        (status = 500, description = "Storage error", body = ApiResponse)
    )
)]
pub async fn list_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, StoreError> {
    let model = ensure_model_registered(&state, &entity).await?;
    let pagination = Pagination::from_query(
        params.get(PAGE_PARAM).map(String::as_str),
        params.get(LIMIT_PARAM).map(String::as_str),
    )?;
    let filter = Filter::from_pairs(params);

    let records =
        with_service(&state, move |s| s.list_page(model.as_ref(), &filter, pagination)).await?;
    Ok(Json(records).into_response())
}

#[utoipa::path(
    get,
    path = "/{entity}/count",
    params(
        ("entity" = String, Path, description = "Entity name (cardapio, cliente, pedido)")
    ),
    responses(
        (status = 200, description = "Number of records", body = CountResponse),
        (status = 404, description = "Unknown entity", body = ApiResponse),
        (status = 500, description = "Storage error", body = ApiResponse)
    )
)]
pub async fn count_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Response, StoreError> {
    let model = ensure_model_registered(&state, &entity).await?;
    let quantidade = with_service(&state, move |s| s.count(model.as_ref())).await?;
    Ok(Json(CountResponse { quantidade }).into_response())
}

#[utoipa::path(
    get,
    path = "/{entity}/{id}",
    params(
        ("entity" = String, Path, description = "Entity name (cardapio, cliente, pedido)"),
        ("id" = u64, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "The record"),
        (status = 400, description = "Invalid id", body = ApiResponse),
        (status = 404, description = "Unknown entity or record", body = ApiResponse),
        (status = 500, description = "Storage error", body = ApiResponse)
    )
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Response, StoreError> {
    let model = ensure_model_registered(&state, &entity).await?;
    let id = parse_id(&id)?;
    let record = with_service(&state, move |s| s.get(model.as_ref(), id)).await?;
    Ok(Json(record).into_response())
}

#[utoipa::path(
    post,
    path = "/{entity}/",
    params(
        ("entity" = String, Path, description = "Entity name (cardapio, cliente, pedido)")
    ),
    request_body(content = Object, description = "Record fields, without id"),
    responses(
        (status = 200, description = "Record created", body = MutationResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Unknown entity, or referenced record missing", body = ApiResponse),
        (status = 422, description = "Body is not JSON", body = ApiResponse),
        (status = 500, description = "Storage error", body = ApiResponse)
    )
)]
pub async fn create_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, StoreError> {
    let model = ensure_model_registered(&state, &entity).await?;
    let Json(payload) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, "a JSON object of record fields").into_response()),
    };

    let target = model.clone();
    let record = with_service(&state, move |s| s.create(target.as_ref(), &payload)).await?;
    let id = record_id(model.as_ref(), &record).unwrap_or_default();

    Ok((
        StatusCode::OK,
        Json(MutationResponse {
            id,
            message: format!("{} {} created successfully", model.label(), id),
            record: Some(JsonValue::Object(record)),
        }),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/{entity}/{id}",
    params(
        ("entity" = String, Path, description = "Entity name (cardapio, cliente, pedido)"),
        ("id" = u64, Path, description = "Record id")
    ),
    request_body(content = Object, description = "Full record body, without id"),
    responses(
        (status = 200, description = "Record replaced", body = MutationResponse),
        (status = 400, description = "Invalid id or validation failed", body = ApiResponse),
        (status = 404, description = "Unknown entity or record", body = ApiResponse),
        (status = 422, description = "Body is not JSON", body = ApiResponse),
        (status = 500, description = "Storage error", body = ApiResponse)
    )
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Response, StoreError> {
    let model = ensure_model_registered(&state, &entity).await?;
    let id = parse_id(&id)?;
    let Json(payload) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, "a JSON object of record fields").into_response()),
    };

    let target = model.clone();
    let record = with_service(&state, move |s| s.update(target.as_ref(), id, &payload)).await?;

    Ok(Json(MutationResponse {
        id,
        message: format!("{} {} updated successfully", model.label(), id),
        record: Some(JsonValue::Object(record)),
    })
    .into_response())
}

#[utoipa::path(
    delete,
    path = "/{entity}/{id}",
    params(
        ("entity" = String, Path, description = "Entity name (cardapio, cliente, pedido)"),
        ("id" = u64, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record removed", body = MutationResponse),
        (status = 400, description = "Invalid id", body = ApiResponse),
        (status = 404, description = "Unknown entity or record", body = ApiResponse),
        (status = 500, description = "Storage error", body = ApiResponse)
    )
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Response, StoreError> {
    let model = ensure_model_registered(&state, &entity).await?;
    let id = parse_id(&id)?;
    let target = model.clone();
    let id = with_service(&state, move |s| s.delete(target.as_ref(), id)).await?;

    Ok(Json(MutationResponse {
        id,
        message: format!("{} {} deleted successfully", model.label(), id),
        record: None,
    })
    .into_response())
}
