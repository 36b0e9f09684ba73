//! Configuration types and loading
//!
//! Values are layered: built-in defaults, then an optional config file, then
//! `GSB_*` environment variables (`GSB_API__BASE_URL`, `GSB_AUTH__PASSWORD`, ...).

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::GsbError;
use crate::pagination::DEFAULT_PAGE_SIZE;

/// Main client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Remote API configuration
    pub api: ApiConfig,

    /// Credentials used to obtain a token
    pub auth: AuthConfig,

    /// Metadata cache configuration
    pub cache: CacheConfig,

    /// Query and form behaviour
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the GSB server, e.g. `https://gsb.example.com`
    pub base_url: String,
    /// Explicit tenant code; overrides the `tc` claim of the token
    pub tenant_code: Option<String>,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    pub user_name: Option<String>,
    pub password: Option<String>,
    /// Pre-issued token; skips the token request when set
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Lifetime of cached entity definitions and enums
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    pub default_page_size: u32,
    /// Delay applied to name uniqueness lookups
    pub name_check_debounce_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
                tenant_code: None,
                request_timeout_seconds: 30,
            },
            auth: AuthConfig::default(),
            cache: CacheConfig {
                ttl_seconds: 300, // 5 minutes
            },
            query: QueryConfig {
                default_page_size: DEFAULT_PAGE_SIZE,
                name_check_debounce_ms: 300,
            },
        }
    }
}

impl ClientConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(file: Option<&str>) -> Result<Self, GsbError> {
        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;

        let mut builder = Config::builder().add_source(defaults);
        if let Some(path) = file {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix("GSB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        config.validate()?;
        tracing::debug!(base_url = %config.api.base_url, "Loaded client configuration");
        Ok(config)
    }

    /// Check values that would only fail later at request time
    pub fn validate(&self) -> Result<(), GsbError> {
        self.base_url()?;
        if self.api.request_timeout_seconds == 0 {
            return Err(GsbError::Config(
                "api.request_timeout_seconds must be positive".to_string(),
            ));
        }
        if self.query.default_page_size == 0 {
            return Err(GsbError::Config(
                "query.default_page_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed base URL
    pub fn base_url(&self) -> Result<Url, GsbError> {
        Url::parse(&self.api.base_url)
            .map_err(|e| GsbError::Config(format!("invalid api.base_url '{}': {}", self.api.base_url, e)))
    }

    /// Absolute URL for an API path such as `/api/entity/query`
    pub fn endpoint(&self, path: &str) -> Result<Url, GsbError> {
        let base = self.base_url()?;
        base.join(path.trim_start_matches('/'))
            .map_err(|e| GsbError::Config(format!("invalid endpoint '{}': {}", path, e)))
    }

    pub fn has_credentials(&self) -> bool {
        self.auth.user_name.is_some() && self.auth.password.is_some()
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.api.request_timeout_seconds)
    }

    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache.ttl_seconds)
    }

    pub fn name_check_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.query.name_check_debounce_ms)
    }
}

fn config_error(e: config::ConfigError) -> GsbError {
    GsbError::Config(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.cache.ttl_seconds, 300);
        assert_eq!(config.query.name_check_debounce_ms, 300);
        assert!(config.validate().is_ok());
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_endpoint_join() {
        let mut config = ClientConfig::default();
        config.api.base_url = "https://gsb.example.com/".to_string();

        let url = config.endpoint("/api/entity/query").unwrap();
        assert_eq!(url.as_str(), "https://gsb.example.com/api/entity/query");
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = ClientConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(GsbError::Config(_))));
    }

    #[test]
    fn test_load_layers_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gsb.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://file.example.com"
tenant_code = "FILE"

[cache]
ttl_seconds = 120
"#,
        )
        .unwrap();

        std::env::set_var("GSB_API__BASE_URL", "https://env.example.com");
        std::env::set_var("GSB_CACHE__TTL_SECONDS", "60");
        let loaded = ClientConfig::load(path.to_str());
        std::env::remove_var("GSB_API__BASE_URL");
        std::env::remove_var("GSB_CACHE__TTL_SECONDS");

        let config = loaded.unwrap();
        assert_eq!(config.api.base_url, "https://env.example.com");
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.api.tenant_code.as_deref(), Some("FILE"));
        assert_eq!(config.api.request_timeout_seconds, 30);
        assert_eq!(config.query.name_check_debounce_ms, 300);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = ClientConfig::load(path.to_str()).unwrap();
        assert_eq!(config.query.default_page_size, DEFAULT_PAGE_SIZE);
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_durations() {
        let config = ClientConfig::default();
        assert_eq!(config.cache_ttl().as_secs(), 300);
        assert_eq!(config.name_check_debounce().as_millis(), 300);
        assert_eq!(config.request_timeout().as_secs(), 30);
    }
}
