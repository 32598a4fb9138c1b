// src/bin/api_server.rs

use restaurant_records::infra::config;
use restaurant_records::transport;
use restaurant_records::{ModelRegistry, RecordService};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    fmt()
        .with_env_filter(EnvFilter::new(config::log_filter()))
        .with_target(true)
        .init();

    // --- Record Service Initialization ---
    let data_dir = config::data_dir();
    info!(data_dir = %data_dir.display(), "initializing record service");
    let service = RecordService::open(&data_dir, ModelRegistry::with_defaults())?;

    // Create missing table files up front so exports work before the first write.
    for name in service.registry().list_models() {
        let model = service.model(&name)?;
        match service.count(model.as_ref()) {
            Ok(n) => info!(entity = %name, records = n, "table ready"),
            Err(e) => {
                error!(entity = %name, error = %e, "table file unusable");
                return Err(e.into());
            }
        }
    }

    let app_state = transport::http::AppState::new(service);

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("API server listening on http://{}", bind_addr);
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received (Ctrl+C)");
}
