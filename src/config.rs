use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, ScraperError};

const CONFIG_PATH: &str = "config.toml";
const TOKEN_ENV: &str = "REGISTRY_API_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: concat!("place_scraper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Which registry integration to chain after a successful identifier
/// extraction. Both return JSON keyed by the cleaned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryProvider {
    /// VAT white-list API: date-parameterized lookup, no credential.
    #[default]
    WhiteList,
    /// Commercial company-index API: bearer credential from the environment.
    CompanyIndex,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub provider: RegistryProvider,
    pub white_list_url: String,
    pub company_index_url: String,
    /// Sourced from `REGISTRY_API_TOKEN`, never from the config file.
    #[serde(skip)]
    pub api_token: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            provider: RegistryProvider::WhiteList,
            white_list_url: "https://wl-api.mf.gov.pl/api/search/nip".to_string(),
            company_index_url: "https://rejestr.io/api/v2/org".to_string(),
            api_token: None,
        }
    }
}

impl Config {
    /// Loads `config.toml` when present, falling back to defaults.
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(CONFIG_PATH).exists() {
            let content = fs::read_to_string(CONFIG_PATH).map_err(|e| {
                ScraperError::Config(format!("failed to read {CONFIG_PATH}: {e}"))
            })?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        config.registry.api_token = env::var(TOKEN_ENV).ok().filter(|token| !token.is_empty());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_the_white_list_provider() {
        let config = Config::default();
        assert_eq!(config.registry.provider, RegistryProvider::WhiteList);
        assert!(config.registry.white_list_url.starts_with("https://"));
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config: Config = toml::from_str(
            r#"
            [registry]
            provider = "company_index"
            company_index_url = "https://registry.example/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.registry.provider, RegistryProvider::CompanyIndex);
        assert_eq!(config.registry.company_index_url, "https://registry.example/api");
        assert!(config.registry.white_list_url.contains("wl-api"));
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let parsed: std::result::Result<Config, _> = toml::from_str(
            r#"
            [registry]
            provider = "krs"
            "#,
        );
        assert!(parsed.is_err());
    }
}
