use crate::config::Config;
use crate::error::AppError;
use std::io::stdout;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Sets up logging for a host process embedding the aggregation engine.
///
/// Logs to a daily rolling file; when `also_stdout` is set, an ANSI
/// stdout layer is added as well. The log file location comes from the
/// config (or its env override), falling back to the platform state
/// directory.
///
/// Returns the path to the log file and the guard that must be kept
/// alive for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(also_stdout: bool) -> Result<(String, WorkerGuard), AppError> {
    let config_log_path = Config::load().await.ok().and_then(|c| c.log_file_path);

    let (log_dir, log_file_name) = match &config_log_path {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path.parent().unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("darts_division.log");
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (Config::get_log_dir_path(), "darts_division.log".to_string()),
    };

    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    // New log file each day
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // The guard must be kept alive for the duration of the program
    // to ensure logs are flushed properly
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry();
    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(
            EnvFilter::from_default_env().add_directive(
                "darts_division=info"
                    .parse()
                    .map_err(|e| AppError::log_setup_error(format!("Bad log directive: {e}")))?,
            ),
        );

    let stdout_layer = if also_stdout {
        Some(
            fmt::Layer::new()
                .with_writer(stdout)
                .with_ansi(true)
                .with_filter(
                    EnvFilter::from_default_env().add_directive(
                        "darts_division=info".parse().map_err(|e| {
                            AppError::log_setup_error(format!("Bad log directive: {e}"))
                        })?,
                    ),
                ),
        )
    } else {
        None
    };

    registry.with(stdout_layer).with(file_layer).init();

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}
