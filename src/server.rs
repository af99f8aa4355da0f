//! Static JSON config server
//!
//! `GET /api/{name}` returns `configs/<name>.json` verbatim. Any failure is
//! a 500 with a fixed body; details only go to the log.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path as UrlPath, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CONFIG_DIR: &str = "configs";
const ERROR_BODY: &str = r#"{"error":"File not found or server error"}"#;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid config name {0:?}")]
    InvalidName(String),
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        log::error!("{}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            ],
            ERROR_BODY,
        )
            .into_response()
    }
}

/// Server settings, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub config_dir: PathBuf,
}

impl ServerConfig {
    /// `PERIODIC_QUIZ_ADDR` and `PERIODIC_QUIZ_CONFIG_DIR`, with defaults
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("PERIODIC_QUIZ_ADDR").ok(),
            std::env::var("PERIODIC_QUIZ_CONFIG_DIR").ok(),
        )
    }

    fn from_vars(addr: Option<String>, config_dir: Option<String>) -> Self {
        let fallback: SocketAddr = ([127, 0, 0, 1], 3000).into();
        let addr = match addr {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("Bad PERIODIC_QUIZ_ADDR {:?} ({}), using {}", raw, e, DEFAULT_ADDR);
                fallback
            }),
            None => fallback,
        };
        Self {
            addr,
            config_dir: config_dir.unwrap_or_else(|| DEFAULT_CONFIG_DIR.into()).into(),
        }
    }
}

/// Names map straight onto file names, so keep them to a safe alphabet
fn config_path(dir: &Path, name: &str) -> Result<PathBuf, ServerError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ServerError::InvalidName(name.to_string()));
    }
    Ok(dir.join(format!("{}.json", name)))
}

async fn serve_config(
    State(dir): State<Arc<PathBuf>>,
    UrlPath(name): UrlPath<String>,
) -> Result<Response, ServerError> {
    let path = config_path(&dir, &name)?;
    let body = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ServerError::Io { path, source })?;
    log::debug!("Served {}", name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        body,
    )
        .into_response())
}

pub fn router(config_dir: PathBuf) -> Router {
    Router::new()
        .route("/api/{name}", get(serve_config))
        .with_state(Arc::new(config_dir))
}

/// Bind and serve until the process is stopped
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    log::info!(
        "Serving {} on http://{}",
        config.config_dir.display(),
        listener.local_addr()?
    );
    axum::serve(listener, router(config.config_dir)).await
}
