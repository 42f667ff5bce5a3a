use std::path::Path;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to `<log_dir>/mazerun.log`.
///
/// The terminal is in raw mode while playing, so nothing is written to stdout.
/// The level defaults to `info` and can be overridden with `RUST_LOG`.
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init_logging(log_dir: &Path) -> std::io::Result<WorkerGuard> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("mazerun")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(std::io::Error::other)?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_names(true)
        .init();

    Ok(guard)
}
