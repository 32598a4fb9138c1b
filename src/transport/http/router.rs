use crate::transport::http::handlers::{exports, health, records};
use crate::transport::http::types::{
    ApiResponse, AppState, CountResponse, DigestResponse, HomeResponse, MutationResponse,
};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::home_handler,
        health::healthcheck_handler,
        records::list_handler,
        records::count_handler,
        records::get_handler,
        records::create_handler,
        records::update_handler,
        records::delete_handler,
        exports::zip_handler,
        exports::sha256_handler,
        exports::xml_handler
    ),
    components(schemas(
        ApiResponse,
        MutationResponse,
        CountResponse,
        DigestResponse,
        HomeResponse
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

/// Per-entity CRUD and export routes. Static segments (`count`, `get_zip`, ...) take
/// precedence over the `{id}` segment.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health::home_handler))
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/:entity",
            get(records::list_handler).post(records::create_handler),
        )
        .route(
            "/:entity/",
            get(records::list_handler).post(records::create_handler),
        )
        .route("/:entity/count", get(records::count_handler))
        .route("/:entity/get_zip", get(exports::zip_handler))
        .route("/:entity/get_sha256", get(exports::sha256_handler))
        .route("/:entity/get_xml", get(exports::xml_handler))
        .route(
            "/:entity/:id",
            get(records::get_handler)
                .put(records::update_handler)
                .delete(records::delete_handler),
        )
        .with_state(app_state)
}
