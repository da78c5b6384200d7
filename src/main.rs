//src/main.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
mod upstream;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::services::storage_service::MAX_UPLOAD_BYTES;

// Folga para os cabeçalhos do multipart; o limite real do arquivo é checado no serviço
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

fn build_router(app_state: AppState) -> Router {
    let upload_routes = Router::new()
        .route(
            "/",
            post(handlers::uploads::upload_file).delete(handlers::uploads::delete_file),
        )
        .route("/presign", get(handlers::uploads::presign))
        .route("/{folder}", post(handlers::uploads::upload_file_to_folder))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    let email_routes = Router::new().route(
        "/delivery-partner/rejected",
        post(handlers::emails::render_partner_rejection),
    );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .nest("/api/uploads", upload_routes)
        .nest("/api/emails", email_routes)
        .with_state(app_state)
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("🔥 Falha ao escutar o sinal de desligamento: {:?}", e);
    }
    tracing::info!("🛑 Desligando: cancelando relatórios em andamento");
    shutdown.cancel();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG sobrescreve; padrão é info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new().await?;
    let addr = app_state.settings.bind_addr.clone();
    let shutdown = app_state.shutdown.clone();

    let app = build_router(app_state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Swagger em http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}
