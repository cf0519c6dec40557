use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Placeholder API key written to fresh config files.
pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

/// Default text-generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Environment variable that switches mock mode on or off.
pub const MOCK_ENV: &str = "LOCFINDER_MOCK";

/// Environment variable holding the Google AI API key.
pub const API_KEY_ENV: &str = "GOOGLE_AI_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Complete locfinder configuration.
///
/// Built once at startup and handed to every component; nothing else reads
/// the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub mock: MockConfig,
}

/// Upstream service URLs and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Nominatim base URL (reverse geocoding)
    pub nominatim_url: String,
    /// Open-Meteo base URL (current weather)
    pub open_meteo_url: String,
    /// Generative Language API base URL
    pub gemini_url: String,
    /// IP geolocation lookup URL (ip-api.com JSON format)
    pub ip_geolocation_url: String,
    /// Sent on every request; Nominatim requires one
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            open_meteo_url: "https://api.open-meteo.com".to_string(),
            gemini_url: "https://generativelanguage.googleapis.com".to_string(),
            ip_geolocation_url: "http://ip-api.com/json/".to_string(),
            user_agent: format!("locfinder/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Where the user's position comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationProviderKind {
    /// Approximate position from the public IP address
    #[default]
    Ip,
    /// The configured latitude/longitude
    Fixed,
    /// No geolocation capability
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub provider: LocationProviderKind,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider: LocationProviderKind::Ip,
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

/// Which canned weather to serve in mock mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherScenario {
    #[default]
    Default,
    Sunny,
    Rainy,
    Snowy,
    Thunderstorm,
    /// Pick one of the named scenarios at random per request
    Random,
}

impl std::str::FromStr for WeatherScenario {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "sunny" => Ok(Self::Sunny),
            "rainy" => Ok(Self::Rainy),
            "snowy" => Ok(Self::Snowy),
            "thunderstorm" => Ok(Self::Thunderstorm),
            "random" => Ok(Self::Random),
            other => Err(ConfigError::Invalid(format!(
                "unknown weather scenario '{}'",
                other
            ))),
        }
    }
}

/// Offline mode: canned responses with simulated latency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub enabled: bool,
    /// Choose canned AI responses at random instead of always the first
    pub randomize: bool,
    pub geocoding_delay_ms: u64,
    pub weather_delay_ms: u64,
    pub ai_delay_ms: u64,
    pub weather_scenario: WeatherScenario,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            randomize: false,
            geocoding_delay_ms: 300,
            weather_delay_ms: 400,
            ai_delay_ms: 800,
            weather_scenario: WeatherScenario::Default,
        }
    }
}

impl MockConfig {
    /// Mock mode with all simulated delays removed.
    pub fn instant() -> Self {
        Self {
            enabled: true,
            geocoding_delay_ms: 0,
            weather_delay_ms: 0,
            ai_delay_ms: 0,
            ..Self::default()
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it if missing,
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            let config = Self::default();
            config.save_to(&path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            config
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from an explicit file. No environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Apply `LOCFINDER_MOCK` and `GOOGLE_AI_KEY` overrides.
    ///
    /// `lookup` is the environment accessor, injectable for tests.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(mock) = lookup(MOCK_ENV) {
            self.mock.enabled = matches!(mock.trim(), "true" | "1");
        }

        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.ai.api_key = key;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(
            &self.endpoints.nominatim_url,
            "endpoints.nominatim_url",
            &mut result,
        );
        validate_url(
            &self.endpoints.open_meteo_url,
            "endpoints.open_meteo_url",
            &mut result,
        );
        validate_url(&self.endpoints.gemini_url, "endpoints.gemini_url", &mut result);
        validate_url(
            &self.endpoints.ip_geolocation_url,
            "endpoints.ip_geolocation_url",
            &mut result,
        );

        if self.endpoints.user_agent.trim().is_empty() {
            result.add_error(
                "endpoints.user_agent",
                "A User-Agent is required by the geocoding service",
            );
        }

        if self.endpoints.request_timeout_secs == 0 {
            result.add_error(
                "endpoints.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.location.provider == LocationProviderKind::Fixed {
            if !(-90.0..=90.0).contains(&self.location.latitude) {
                result.add_error("location.latitude", "Latitude must be within -90..=90");
            }
            if !(-180.0..=180.0).contains(&self.location.longitude) {
                result.add_error(
                    "location.longitude",
                    "Longitude must be within -180..=180",
                );
            }
        }

        if self.ai.model.trim().is_empty() {
            result.add_error("ai.model", "Model name must not be empty");
        }

        if !self.mock.enabled && !is_api_key_valid(&self.ai.api_key) {
            result.add_warning(
                "ai.api_key",
                format!("API key not set - set {} to enable AI insights", API_KEY_ENV),
            );
        }

        result
    }

    /// Save configuration to an explicit file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("locfinder");

        Ok(config_dir.join("config.toml"))
    }
}

/// A key is usable when present and not the placeholder value.
pub fn is_api_key_valid(api_key: &str) -> bool {
    !api_key.is_empty() && api_key != API_KEY_PLACEHOLDER
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
