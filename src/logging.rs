//!
//! src/logging.rs  Andrew Belles  Oct 19th, 2026
//!
//! Initializes logger. Events go to stderr, or to a log file when one
//! is configured, so that stdout only ever carries rendered markup
//!
//!

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tracing_error::ErrorLayer;
use tracing_appender::non_blocking;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::config::{LogFormat, LoggingConfig};
use crate::errors::AdminError;

pub struct LoggingGuard(#[allow(dead_code)] tracing_appender::non_blocking::WorkerGuard);

/// Splits a log path into the appender's directory and file name
fn split_log_path(path: &Path) -> Result<(&Path, String), AdminError> {
    let name = path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AdminError::Config(format!("log file has no name: {}", path.display())))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new(".")
    };
    Ok( (dir, name) )
}

fn log_file(path: &Path) -> Result<RollingFileAppender, AdminError> {
    let (dir, name) = split_log_path(path)?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .map_err(|e| AdminError::Config(format!("log file {}: {e}", path.display())))
}

pub fn init_logging(cfg: &LoggingConfig) -> Result<LoggingGuard, AdminError> {
    let (writer, guard) = match cfg.file.as_deref() {
        Some(path) => non_blocking(log_file(path)?),
        None => non_blocking(std::io::stderr())
    };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(cfg.filter_directives.clone()));

    let time = tracing_subscriber::fmt::time::UtcTime::rfc_3339();
    let json_layer = (cfg.format == LogFormat::Json).then(|| fmt::layer()
        .with_writer(writer.clone())
        .with_timer(time.clone())
        .with_target(cfg.include_target)
        .with_file(cfg.include_file_line)
        .with_line_number(cfg.include_file_line)
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(true));

    // terminal friendly, colors only when writing to stderr
    let compact_layer = (cfg.format == LogFormat::Compact).then(|| fmt::layer()
        .with_writer(writer)
        .with_timer(time)
        .with_target(cfg.include_target)
        .with_ansi(cfg.file.is_none())
        .compact());

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(compact_layer)
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| AdminError::Config(format!("logger: {e}")))?;

    Ok( LoggingGuard(guard) )
}
