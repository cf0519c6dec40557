pub mod config;
pub mod error;
pub mod resource;

pub use config::{
    is_api_key_valid, AiConfig, Config, EndpointsConfig, LocationConfig, LocationProviderKind,
    MockConfig, ValidationResult, WeatherScenario, API_KEY_PLACEHOLDER, DEFAULT_MODEL,
};
pub use error::{ConfigError, NetworkError, ReqwestErrorExt, ServiceError, UNKNOWN_ERROR};
pub use resource::{ResourceState, SharedResource, Ticket};

use anyhow::Result;

/// Initialize logging for the locfinder binaries.
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!("locfinder core initialized");
    Ok(())
}
