//! Root configuration type.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LoggingConfig, PolicyConfig, ServerConfig};

/// Complete gosd configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use gosd_config::GosdConfig;
///
/// let config = GosdConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:3000");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct GosdConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Policy document configuration.
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl GosdConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - `server.http_addr` is not a socket address
    /// - `server.api_prefix` does not start with `/` or ends with `/`
    /// - `server.request_timeout_ms` is zero
    /// - `logging.level` is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        let prefix = self.server.api_prefix.as_str();
        if !prefix.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "server.api_prefix",
                format!("must start with '/': {prefix}"),
            ));
        }
        if prefix.len() > 1 && prefix.ends_with('/') {
            return Err(ConfigError::invalid_value(
                "server.api_prefix",
                format!("must not end with '/': {prefix}"),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.logging.enabled {
            gosd_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializeError`] if rendering fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogFormat;

    fn with_prefix(prefix: &str) -> GosdConfig {
        let mut config = GosdConfig::default();
        config.server.api_prefix = prefix.to_string();
        config
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(GosdConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_http_addr() {
        let mut config = GosdConfig::default();
        config.server.http_addr = "localhost".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.http_addr"));
    }

    #[test]
    fn test_api_prefix_rules() {
        assert!(with_prefix("/").validate().is_ok());
        assert!(with_prefix("/v4").validate().is_ok());
        assert!(with_prefix("/api/v4").validate().is_ok());
        assert!(with_prefix("v4").validate().is_err());
        assert!(with_prefix("/v4/").validate().is_err());
        assert!(with_prefix("").validate().is_err());
    }

    #[test]
    fn test_zero_request_timeout() {
        let mut config = GosdConfig::default();
        config.server.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = GosdConfig::default();
        config.logging.level = "gosd=chatty".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));

        // not checked when logging is off
        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<GosdConfig, _> = toml::from_str("[metrics]\nenabled = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = GosdConfig::default();
        config.server.http_addr = "127.0.0.1:3000".to_string();
        config.logging.format = LogFormat::Pretty;
        config.policy.path = Some("/etc/gosd/policy.json".to_string());

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[server]"));
        assert!(rendered.contains("api_prefix = \"/v4\""));

        let parsed: GosdConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
