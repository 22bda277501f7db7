//! Host side of the Power BI provider: configuration, logging, the JSON
//! request/response protocol and the resource registry.

pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod registry;

use std::io::{Read, Write};
use std::sync::Arc;

use pbi_api::PowerBiClient;
use secrecy::ExposeSecret;

use config::ProviderConfig;
use error::ProviderResult;
use protocol::Response;
use registry::ProviderRegistry;

/// Registry backed by the live REST client described by `config`.
pub fn live_registry(config: &ProviderConfig) -> ProviderResult<ProviderRegistry> {
    let token = config.access_token()?;
    let client = PowerBiClient::new(
        &config.api_base_url,
        token.expose_secret(),
        config.timeout_secs,
    )?;
    Ok(ProviderRegistry::new(Arc::new(client)))
}

/// Answer one request read from `input`, writing the response to `output`.
pub async fn serve<R: Read, W: Write>(
    config: &ProviderConfig,
    mut input: R,
    mut output: W,
) -> ProviderResult<Response> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;

    let response = match live_registry(config) {
        Ok(registry) => registry.handle_json(&raw).await,
        Err(e) => Response::error(e),
    };

    write_response(&mut output, &response)?;
    Ok(response)
}

pub fn write_response<W: Write>(output: &mut W, response: &Response) -> ProviderResult<()> {
    serde_json::to_writer(&mut *output, response)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

/// Binary entry point.
pub async fn run() -> ProviderResult<Response> {
    let config = match ProviderConfig::load() {
        Ok(c) => c,
        Err(e) => {
            let response = Response::error(e);
            write_response(&mut std::io::stdout().lock(), &response)?;
            return Ok(response);
        }
    };
    if let Err(e) = logging::init_logging(config.log_format) {
        eprintln!("{}", e);
    }
    tracing::debug!(api = %config.api_base_url, timeout_secs = config.timeout_secs, "configuration loaded");
    serve(&config, std::io::stdin().lock(), std::io::stdout().lock()).await
}
