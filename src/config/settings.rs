use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::notification::{Channel, DispatcherConfig};

/// Prefix for environment overrides, e.g. `NOTIFY_SERVER__PORT=9000`
const ENV_PREFIX: &str = "NOTIFY";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub otel: OtelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelsConfig {
    /// Channel names the strategy registry is built from
    #[serde(default = "default_enabled_channels")]
    pub enabled: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// Upper bound for a single delivery in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Deliveries allowed in flight at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    /// OTLP gRPC endpoint
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Trace sampling ratio (0.0-1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    64 * 1024 // 64 KiB
}

fn default_enabled_channels() -> Vec<String> {
    Channel::ALL.iter().map(|c| c.as_str().to_string()).collect()
}

fn default_timeout_ms() -> u64 {
    5_000 // 5 seconds
}

fn default_max_concurrent() -> usize {
    64
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "notification-router".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // NOTIFY_SERVER__PORT, NOTIFY_CHANNELS__ENABLED=email,discord, etc.
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("channels.enabled")
                    .with_list_parse_key("server.cors_origins"),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.enabled.is_empty() {
            return Err(ConfigError::Message(
                "channels.enabled must list at least one channel".to_string(),
            ));
        }
        if self.delivery.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "delivery.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.otel.sampling_ratio) {
            return Err(ConfigError::Message(format!(
                "otel.sampling_ratio must be between 0.0 and 1.0, got {}",
                self.otel.sampling_ratio
            )));
        }
        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Dispatcher limits derived from the `delivery` section
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            delivery_timeout: Duration::from_millis(self.delivery.timeout_ms),
            max_concurrent: self.delivery.max_concurrent,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            body_limit: default_body_limit(),
        }
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_channels(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server_addr(), "0.0.0.0:8080");
        assert_eq!(
            settings.channels.enabled,
            vec!["discord", "instagram", "twitter", "email", "whatsapp"]
        );
        assert!(!settings.otel.enabled);
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_dispatcher_config() {
        let mut settings = Settings::default();
        settings.delivery.timeout_ms = 250;
        settings.delivery.max_concurrent = 8;

        let config = settings.dispatcher_config();
        assert_eq!(config.delivery_timeout, Duration::from_millis(250));
        assert_eq!(config.max_concurrent, 8);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.channels.enabled.clear();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.delivery.timeout_ms = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.otel.sampling_ratio = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let settings: Settings = Config::builder()
            .set_override("server.port", 9090)
            .unwrap()
            .set_override("channels.enabled", vec!["email", "discord"])
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.channels.enabled, vec!["email", "discord"]);
        assert_eq!(settings.delivery.timeout_ms, 5_000);
        assert_eq!(settings.logging.format, LogFormat::Json);
    }
}
