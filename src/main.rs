use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use proximities_api::config::DEFAULT_CONFIG_PATH;
use proximities_api::{database_health, health_check, AppError, AppState};
use std::env;
use std::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> proximities_api::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config_path = env::var("CONNEXION_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());

    // Engine, session factory and search path are built once, before serving
    let state = AppState::from_path(&config_path)?;
    let server = state.config.server.clone();

    let listener = TcpListener::bind(format!("{}:{}", server.host, server.port))?;
    info!("Starting server at {}:{}", server.host, server.port);

    let data = web::Data::new(state.clone());
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/health", web::get().to(health_check))
            .route("/health/db", web::get().to(database_health))
    })
    .listen(listener)?
    .workers(server.workers.max(1) as usize)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    state.shutdown().await?;
    info!("Server stopped");

    Ok(())
}
