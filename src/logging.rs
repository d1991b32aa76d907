use tracing::Level;
use tracing_subscriber::fmt;

use crate::args::LogLevel;

/// Send diagnostics to stderr; stdout carries only the listing report.
pub fn init_logging(level: LogLevel) -> anyhow::Result<()> {
    let level: Level = level.into();

    fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
