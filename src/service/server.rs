use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use super::api::{self, AppState, SharedState};
use super::db::{BoardDb, DbHandle};
use crate::config::ServerSection;
use crate::errors::ServerError;

/// Configuration for the board server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub dev_mode: bool,
    pub auth_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3142,
            db_path: PathBuf::from(".netboard/board.db"),
            dev_mode: false,
            auth_token: None,
        }
    }
}

impl From<&ServerSection> for ServerConfig {
    fn from(section: &ServerSection) -> Self {
        Self {
            port: section.port,
            db_path: section.db_path.clone(),
            dev_mode: section.dev_mode,
            auth_token: section.auth_token.clone(),
        }
    }
}

pub fn app_state(db: BoardDb, auth_token: Option<String>) -> SharedState {
    Arc::new(AppState {
        db: DbHandle::new(db),
        auth_token,
    })
}

/// Build the full application router.
pub fn build_router(state: SharedState) -> Router {
    api::api_router().fallback(not_found).with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Not found"})),
    )
}

/// Serve `app` on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;
    Ok(())
}

/// Start the board server.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    if let Some(parent) = config.db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let db = BoardDb::new(&config.db_path).map_err(ServerError::Database)?;
    let state = app_state(db, config.auth_token.clone());

    let mut app = build_router(state);
    if config.dev_mode {
        app = app.layer(CorsLayer::permissive());
    }

    let host = if config.dev_mode { "0.0.0.0" } else { "127.0.0.1" };
    let addr = format!("{}:{}", host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    let local_addr = listener.local_addr().context("Failed to read local address")?;
    info!(
        addr = %local_addr,
        db = %config.db_path.display(),
        auth = config.auth_token.is_some(),
        "board server listening"
    );
    println!("Network board running at http://{}", local_addr);

    serve(listener, app, shutdown_signal()).await?;

    info!("board server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down...");
}
