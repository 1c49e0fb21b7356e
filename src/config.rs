//! torero-api configuration — deserialization, defaults and validation.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ToreroError;

fn default_binary() -> String {
    "torero".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Top-level configuration, parsed from `torero-api.toml`.
///
/// Every field has a default, so an empty file (or no file at all) is a
/// valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToreroApiConfig {
    #[serde(default)]
    pub torero: ToreroConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// How to invoke the torero executable.
#[derive(Debug, Clone, Deserialize)]
pub struct ToreroConfig {
    /// Executable name resolved via PATH, or an absolute path.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Timeout for `torero version` (availability and version checks).
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Timeout for `torero get <kind> --raw`.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for ToreroConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            probe_timeout_secs: default_probe_timeout_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl ToreroConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ToreroApiConfig {
    /// Validate the config, failing fast before the server binds.
    pub fn validate(&self) -> crate::Result<()> {
        if self.torero.binary.trim().is_empty() {
            return Err(ToreroError::InvalidConfig(
                "torero.binary must not be empty".to_string(),
            ));
        }

        if self.torero.probe_timeout_secs == 0 {
            return Err(ToreroError::InvalidConfig(
                "torero.probe_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.torero.fetch_timeout_secs == 0 {
            return Err(ToreroError::InvalidConfig(
                "torero.fetch_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.server.host.trim().is_empty() {
            return Err(ToreroError::InvalidConfig(
                "server.host must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_toml(toml_str: &str) -> ToreroApiConfig {
        toml::from_str(toml_str).expect("valid TOML")
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_toml("");
        assert_eq!(config.torero.binary, "torero");
        assert_eq!(config.torero.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.torero.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_toml(
            r#"
            [torero]
            binary = "/opt/torero/bin/torero"

            [server]
            port = 9090
            "#,
        );
        assert_eq!(config.torero.binary, "/opt/torero/bin/torero");
        assert_eq!(config.torero.fetch_timeout_secs, 30);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_empty_binary_rejected() {
        let config = parse_toml(
            r#"
            [torero]
            binary = "  "
            "#,
        );
        let result = config.validate();
        assert!(
            matches!(result, Err(ToreroError::InvalidConfig(msg)) if msg.contains("binary"))
        );
    }

    #[test]
    fn test_zero_fetch_timeout_rejected() {
        let config = parse_toml(
            r#"
            [torero]
            fetch_timeout_secs = 0
            "#,
        );
        let result = config.validate();
        assert!(
            matches!(result, Err(ToreroError::InvalidConfig(msg)) if msg.contains("fetch_timeout_secs"))
        );
    }

    #[test]
    fn test_zero_probe_timeout_rejected() {
        let config = parse_toml(
            r#"
            [torero]
            probe_timeout_secs = 0
            "#,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_top_level_section_ignored() {
        let config = parse_toml(
            r#"
            [metrics]
            enabled = true
            "#,
        );
        assert!(config.validate().is_ok());
    }
}
