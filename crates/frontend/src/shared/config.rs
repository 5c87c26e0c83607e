use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const API_BASE_ENV: &str = "STOREFRONT_API_BASE";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token issued by the auth service; never obtained here
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://127.0.0.1:3000"
timeout_secs = 30
"#;

impl ClientConfig {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.api.auth_token = Some(token.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://127.0.0.1:3000".to_string(),
                timeout_secs: default_timeout_secs(),
                auth_token: None,
            },
        }
    }
}

/// Load client configuration
///
/// Search order:
/// 1. `path`, when given and present
/// 2. Falls back to embedded default config
///
/// `STOREFRONT_API_BASE` overrides the base URL in both cases.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    let mut config = match path {
        Some(path) if path.exists() => {
            log::info!("Loading client config from: {}", path.display());
            let contents = std::fs::read_to_string(path)?;
            ClientConfig::from_toml_str(&contents)?
        }
        Some(path) => {
            log::warn!("client config not found at: {}", path.display());
            ClientConfig::from_toml_str(DEFAULT_CONFIG)?
        }
        None => ClientConfig::from_toml_str(DEFAULT_CONFIG)?,
    };

    if let Ok(base) = std::env::var(API_BASE_ENV) {
        if !base.trim().is_empty() {
            config.api.base_url = base;
        }
    }
    Ok(config)
}
