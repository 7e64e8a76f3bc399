pub mod config;
pub mod db;
pub mod error;
pub mod search_path;

use std::path::Path;
use std::sync::Arc;
use actix_web::{web, HttpResponse};
use tracing::{info, warn};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use db::{Engine, PoolStatus, Session, SessionFactory};
pub use search_path::SearchPath;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Database health endpoint handler
/// Opens a session, runs a trivial query and reports pool usage
pub async fn database_health(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut session = state.sessions.session();
    let answer = session.fetch_scalar_i64("SELECT 1::bigint").await?;
    session.close().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "database": if answer == 1 { "reachable" } else { "unexpected" },
        "pool": state.engine.status(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub search_path: Arc<SearchPath>,
    pub engine: Engine,
    pub sessions: SessionFactory,
}

impl AppState {
    /// Extend the search path, then build the engine and its session factory.
    ///
    /// Every call produces an independent engine. Must run inside a Tokio
    /// runtime.
    pub fn new(config: Settings) -> Result<Self> {
        let proximities = &config.sys_path.proximities;
        if !proximities.is_dir() {
            warn!("Proximities directory {} does not exist", proximities.display());
        }
        let mut search_path = SearchPath::new();
        search_path.append(proximities);

        let engine = Engine::new(&config.postgres, &config.pool)?;
        let sessions = SessionFactory::new(engine.clone());

        Ok(Self {
            config: Arc::new(config),
            search_path: Arc::new(search_path),
            engine,
            sessions,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Settings::from_path(path.as_ref())?;
        info!("Configuration loaded from {}", path.as_ref().display());
        Self::new(config)
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.engine.dispose().await;
        Ok(())
    }
}
