//! Error types for the TUI.

use crate::api_client::ApiClientError;
use crate::config::ConfigError;
use crate::realtime::PushError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiClientError),
    #[error("Failed to open log file {path}: {source}")]
    Logging {
        path: std::path::PathBuf,
        source: tracing_appender::rolling::InitError,
    },
    #[error("Initial fetch failed: {0}")]
    InitialFetch(#[source] ApiClientError),
    #[error("Push channel unavailable at startup: {0}")]
    PushConnect(#[source] ApiClientError),
    #[error("Push channel lost: {0}")]
    Push(#[from] PushError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
