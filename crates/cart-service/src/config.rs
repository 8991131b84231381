//! Service configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all, via
//! [`ServiceConfig::default`]) yields a usable configuration:
//!
//! ```toml
//! [inventory]
//! base_url = "http://localhost:3333"
//! timeout_secs = 10
//!
//! [storage]
//! dir = ".cart"
//! key = "cart"
//!
//! [actor]
//! buffer_size = 32
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable the CLI reads the config path from.
pub const CONFIG_ENV: &str = "CART_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub actor: ActorConfig,
}

impl ServiceConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// Remote inventory API.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryConfig {
    /// Root of the API; `products/{id}` and `stock/{id}` are resolved against it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Where the cart blob lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            key: default_storage_key(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorConfig {
    /// Capacity of the request channel; callers wait when it is full.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".cart")
}

fn default_storage_key() -> String {
    "cart".to_string()
}

fn default_buffer_size() -> usize {
    32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ServiceConfig::parse("").unwrap();
        assert_eq!(config.inventory.base_url, "http://localhost:3333");
        assert_eq!(config.inventory.timeout_secs, 10);
        assert_eq!(config.storage.dir, PathBuf::from(".cart"));
        assert_eq!(config.storage.key, "cart");
        assert_eq!(config.actor.buffer_size, 32);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = ServiceConfig::parse(
            r#"
            [inventory]
            base_url = "https://shop.example.com/api"

            [storage]
            key = "guest"
            "#,
        )
        .unwrap();
        assert_eq!(config.inventory.base_url, "https://shop.example.com/api");
        assert_eq!(config.inventory.timeout_secs, 10);
        assert_eq!(config.storage.key, "guest");
        assert_eq!(config.storage.dir, PathBuf::from(".cart"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(ServiceConfig::parse("[storage]\npath = \"x\"").is_err());
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("absent.toml");
        assert!(matches!(ServiceConfig::load(&missing), Err(ConfigError::Read { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::File::create(&bad)
            .unwrap()
            .write_all(b"[actor]\nbuffer_size = \"many\"")
            .unwrap();
        assert!(matches!(ServiceConfig::load(&bad), Err(ConfigError::Parse { .. })));

        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[actor]\nbuffer_size = 4\n").unwrap();
        assert_eq!(ServiceConfig::load(&good).unwrap().actor.buffer_size, 4);
    }
}
