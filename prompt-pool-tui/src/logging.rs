//! File logging. The terminal owns stdout, so diagnostics go to a file.

use crate::config::TuiConfig;
use crate::error::TuiError;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "prompt_pool_tui=info";

/// Install the global subscriber writing to `config.log_path`.
///
/// The returned guard flushes buffered lines when dropped; hold it until exit.
pub fn init(config: &TuiConfig) -> Result<WorkerGuard, TuiError> {
    let path = config.log_path.as_path();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "prompt-pool.log".to_string());

    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|source| TuiError::Logging {
            path: path.to_path_buf(),
            source,
        })?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(build_filter())
        .init();

    Ok(guard)
}

/// `PROMPT_POOL_LOG` overrides the default directives.
fn build_filter() -> EnvFilter {
    EnvFilter::try_from_env("PROMPT_POOL_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
