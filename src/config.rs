use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub environment: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the payment backend, e.g. https://api.example.com/api
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
            user_agent: format!("smartpay-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Load from an optional `smartpay.{toml,yaml,json}` file, then `SMARTPAY__*` variables
    pub fn load() -> Result<Self> {
        Self::load_from("smartpay")
    }

    pub fn load_from(file_stem: &str) -> Result<Self> {
        let defaults = ApiConfig::default();

        let config: Config = config::Config::builder()
            .set_default("api.base_url", defaults.base_url)?
            .set_default("api.timeout_secs", defaults.timeout_secs)?
            .set_default("api.user_agent", defaults.user_agent)?
            .set_default("environment", "development")?
            .set_default("log_level", "info")?
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(config::Environment::with_prefix("SMARTPAY").separator("__"))
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(anyhow!("api.base_url cannot be empty"));
        }

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow!(
                "api.base_url must start with http:// or https://, got {}",
                base_url
            ));
        }

        if self.api.timeout_secs == 0 || self.api.timeout_secs > 120 {
            return Err(anyhow!(
                "api.timeout_secs must be between 1 and 120, got {}",
                self.api.timeout_secs
            ));
        }

        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.environment.as_str()) {
            return Err(anyhow!(
                "Environment must be one of: {:?}, got {}",
                valid_environments,
                self.environment
            ));
        }

        if self.environment == "production" && base_url.starts_with("http://") {
            return Err(anyhow!("api.base_url must use https in production"));
        }

        Ok(())
    }
}
