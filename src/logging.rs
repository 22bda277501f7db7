//! Subscriber setup for the host binary.
//!
//! stdout carries the protocol response, so all log output goes to stderr.
//! The library crates log through `log`; the `tracing-log` bridge installed by
//! `try_init` forwards those records here.

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;
use crate::error::{ProviderError, ProviderErrorKind, ProviderResult};

pub const ENV_LOG: &str = "POWERBI_LOG";
pub const DEFAULT_DIRECTIVE: &str = "info";

/// `POWERBI_LOG`, else `RUST_LOG`, else `info`. Unparsable values are skipped.
pub fn filter_from(powerbi_log: Option<String>, rust_log: Option<String>) -> EnvFilter {
    [powerbi_log, rust_log]
        .into_iter()
        .flatten()
        .filter(|d| !d.trim().is_empty())
        .find_map(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

pub fn init_logging(format: LogFormat) -> ProviderResult<()> {
    let filter = filter_from(std::env::var(ENV_LOG).ok(), std::env::var("RUST_LOG").ok());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    result.map_err(|e| ProviderError::new(ProviderErrorKind::Logging, e.to_string()))
}
