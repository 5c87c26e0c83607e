use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    /// JSON file with initial rows per collection
    #[serde(default)]
    pub seed_path: Option<String>,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[store]
"#;

impl Config {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return Config::from_toml_str(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    Config::from_toml_str(DEFAULT_CONFIG)
}

/// Seed file path, resolved relative to the executable directory
pub fn get_seed_path(config: &Config) -> Option<PathBuf> {
    let seed = config.store.seed_path.as_deref()?;
    let path = Path::new(seed);

    if path.is_absolute() {
        return Some(path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Some(exe_dir.join(path));
        }
    }

    Some(PathBuf::from(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = Config::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.store.seed_path.is_none());
        assert!(get_seed_path(&config).is_none());
        assert_eq!(config.server.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_store_section_is_optional() {
        let config = Config::from_toml_str("[server]\nhost = \"127.0.0.1\"\nport = 8081\n").unwrap();
        assert_eq!(config.server.socket_addr().unwrap().to_string(), "127.0.0.1:8081");
    }

    #[test]
    fn test_absolute_seed_path_kept() {
        let config = Config::from_toml_str(
            "[server]\nhost = \"127.0.0.1\"\nport = 1\n[store]\nseed_path = \"/srv/seed.json\"\n",
        )
        .unwrap();
        assert_eq!(get_seed_path(&config), Some(PathBuf::from("/srv/seed.json")));
    }
}
