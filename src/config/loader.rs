//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Token environment variables (SERVICE_CALL_TOKEN)
//! 2. Environment variables (SERVICE_CALL__*)
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "service-call.toml",
    ".service-call.toml",
    "~/.config/service-call/config.toml",
];

/// Environment variable carrying the bearer token
pub const TOKEN_ENV_VAR: &str = "SERVICE_CALL_TOKEN";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on AppConfig)

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with SERVICE_CALL__ prefix
    // e.g., SERVICE_CALL__HTTP__BASE_URL, SERVICE_CALL__LOGGING__LEVEL
    // Double underscore (__) maps to nested keys (http.base_url)
    builder = builder.add_source(
        Environment::with_prefix("SERVICE_CALL")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    // 4. Dedicated token variable wins over everything else
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
        && !token.is_empty()
    {
        builder = builder
            .set_override("auth.token", token)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.http.base_url.is_empty() {
        return Err(ConfigError::Missing {
            field: "http.base_url".to_string(),
        });
    }

    if !config.http.base_url.starts_with("http://") && !config.http.base_url.starts_with("https://")
    {
        return Err(ConfigError::Invalid {
            message: format!(
                "http.base_url must start with http:// or https://, got: {}",
                config.http.base_url
            ),
        });
    }

    if config.http.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "http.timeout_secs must be greater than 0".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_str_basic() {
        let config = load_config_from_str(
            r#"
[http]
base_url = "https://api.example.com"
"#,
        )
        .unwrap();

        assert_eq!(config.http.base_url, "https://api.example.com");
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_missing_base_url() {
        let result = load_config_from_str("[logging]\nlevel = \"debug\"\n");
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_invalid_scheme() {
        let result = load_config_from_str(
            r#"
[http]
base_url = "ftp://example.com"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_zero_timeout() {
        let result = load_config_from_str(
            r#"
[http]
base_url = "https://api.example.com"
timeout_secs = 0
"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = load_config(Some("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
