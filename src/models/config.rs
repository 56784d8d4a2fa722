//! Application configuration structures.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable holding the API token.
pub const TOKEN_ENV_VAR: &str = "APIFY_API_TOKEN";

/// Older name of the token variable, still honoured as a fallback.
pub const LEGACY_TOKEN_ENV_VAR: &str = "APIFY_API_KEY";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Platform client settings
    #[serde(default)]
    pub apify: ApifyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.apify.validate()
    }
}

/// Platform client settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApifyConfig {
    /// API token; takes precedence over the environment
    #[serde(default)]
    pub api_token: Option<String>,

    /// API root, without the `/v2` suffix
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Server-side long-poll window while waiting for a run
    #[serde(default = "defaults::wait")]
    pub wait_secs: u64,
}

impl Default for ApifyConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            wait_secs: defaults::wait(),
        }
    }
}

impl fmt::Debug for ApifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApifyConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("wait_secs", &self.wait_secs)
            .finish()
    }
}

impl ApifyConfig {
    /// Config with an explicit token and default settings otherwise.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            api_token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::validation("apify.base_url is empty"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(AppError::validation("apify.user_agent is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::validation("apify.timeout_secs must be > 0"));
        }
        if !(1..=defaults::MAX_WAIT_SECS).contains(&self.wait_secs) {
            return Err(AppError::validation(format!(
                "apify.wait_secs must be between 1 and {}",
                defaults::MAX_WAIT_SECS
            )));
        }
        if self.timeout_secs <= self.wait_secs {
            return Err(AppError::validation(
                "apify.timeout_secs must exceed apify.wait_secs",
            ));
        }
        Ok(())
    }

    /// Resolve the API token from this config or the process environment.
    pub fn resolve_token(&self) -> Result<String> {
        self.resolve_token_with(|name| std::env::var(name).ok())
    }

    /// Resolve the API token using `lookup` in place of the process environment.
    ///
    /// Order: explicit `api_token`, then [`TOKEN_ENV_VAR`], then
    /// [`LEGACY_TOKEN_ENV_VAR`]. Blank values are treated as absent.
    pub fn resolve_token_with<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = self.api_token.clone();
        explicit
            .into_iter()
            .chain(lookup(TOKEN_ENV_VAR))
            .chain(lookup(LEGACY_TOKEN_ENV_VAR))
            .map(|token| token.trim().to_string())
            .find(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::config(format!(
                    "Did not find an Apify API token: set `api_token` or the `{}` environment variable",
                    TOKEN_ENV_VAR
                ))
            })
    }
}

mod defaults {
    pub const MAX_WAIT_SECS: u64 = 60;

    pub fn base_url() -> String {
        "https://api.apify.com".into()
    }
    pub fn user_agent() -> String {
        concat!("apify-loader/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        120
    }
    pub fn wait() -> u64 {
        MAX_WAIT_SECS
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let config = ApifyConfig::default();
        let err = config.resolve_token_with(env_of(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_explicit_token_wins() {
        let config = ApifyConfig::with_token("explicit");
        let token = config
            .resolve_token_with(env_of(&[(TOKEN_ENV_VAR, "from-env")]))
            .unwrap();
        assert_eq!(token, "explicit");
    }

    #[test]
    fn test_token_from_env() {
        let config = ApifyConfig::default();
        let token = config
            .resolve_token_with(env_of(&[
                (TOKEN_ENV_VAR, "abc123"),
                (LEGACY_TOKEN_ENV_VAR, "legacy"),
            ]))
            .unwrap();
        assert_eq!(token, "abc123");
    }

    #[test]
    fn test_legacy_env_fallback() {
        let config = ApifyConfig::default();
        let token = config
            .resolve_token_with(env_of(&[(LEGACY_TOKEN_ENV_VAR, "legacy")]))
            .unwrap();
        assert_eq!(token, "legacy");
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = ApifyConfig::with_token("   ");
        let token = config
            .resolve_token_with(env_of(&[(TOKEN_ENV_VAR, "abc123")]))
            .unwrap();
        assert_eq!(token, "abc123");

        let err = config.resolve_token_with(env_of(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config {
            apify: ApifyConfig::with_token("abc123"),
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("abc123"));
        assert!(printed.contains("api_token: Some(\"<redacted>\")"));
        assert!(printed.contains("https://api.apify.com"));

        let printed = format!("{:?}", ApifyConfig::default());
        assert!(printed.contains("api_token: None"));
    }

    #[test]
    fn test_validate_rejects_bad_wait() {
        let mut config = ApifyConfig::default();
        config.wait_secs = 0;
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));

        config.wait_secs = 61;
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_timeout_below_wait() {
        let mut config = ApifyConfig::default();
        config.timeout_secs = 30;
        assert!(config.validate().is_err());

        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[apify]\napi_token = \"from-file\"\nwait_secs = 30"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.apify.api_token.as_deref(), Some("from-file"));
        assert_eq!(config.apify.wait_secs, 30);
        assert_eq!(config.apify.base_url, "https://api.apify.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert!(config.apify.api_token.is_none());
        assert_eq!(config.apify.timeout_secs, 120);
    }
}
