use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub appservice: AppserviceConfig,
    #[serde(default)]
    pub webserver: WebserverConfig,
    #[serde(default)]
    pub formatting: FormattingConfig,
}

/// Connection to the homeserver and the bridge's user namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppserviceConfig {
    pub homeserver_url: String,
    pub homeserver_name: String,
    pub bind_address: String,
    pub port: u16,
    /// Localpart prefix of puppet users, followed by the player UUID.
    pub user_prefix: String,
    pub bot_localpart: String,
}

impl Default for AppserviceConfig {
    fn default() -> Self {
        Self {
            homeserver_url: "https://matrix.org".to_string(),
            homeserver_name: "matrix.org".to_string(),
            bind_address: "0.0.0.0".to_string(),
            port: 3051,
            user_prefix: "_mc_".to_string(),
            bot_localpart: "_mc_bot".to_string(),
        }
    }
}

/// The endpoint game servers post events to.
///
/// A missing `priv_key` is generated afresh on every load; use
/// [`Config::load_or_create_at`] to have it written back to the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebserverConfig {
    pub port: u16,
    pub priv_key: Uuid,
}

impl Default for WebserverConfig {
    fn default() -> Self {
        Self {
            port: 3052,
            priv_key: Uuid::new_v4(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    pub paragraph_separator: String,
    /// Markup nested deeper than this is dropped.
    pub max_depth: usize,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            paragraph_separator: "\n".to_string(),
            max_depth: 100,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in addresses
        let appservice = &mut config.appservice;
        for value in [
            &mut appservice.homeserver_url,
            &mut appservice.homeserver_name,
            &mut appservice.bind_address,
        ] {
            if let Some(expanded) = Self::expand(value) {
                *value = expanded;
            }
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load the config at `config_path`, writing defaults there first if it
    /// does not exist yet. A file without a webserver key gets the generated
    /// key added, so later loads see the same one.
    pub fn load_or_create_at<P: AsRef<Path>>(config_path: P) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();
        if let Some(config) = Self::load_from_path(config_path)? {
            Self::persist_private_key(config_path, &config.webserver.priv_key)?;
            return Ok(config);
        }
        let config = Self::default();
        config.save_to_path(config_path)?;
        Ok(config)
    }

    /// Add `priv_key` to the `[webserver]` table of the file when absent.
    /// Other values are written back unexpanded.
    fn persist_private_key(config_path: &Path, priv_key: &Uuid) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(config_path)?;
        let mut table: toml::Table = toml::from_str(&content)?;

        let webserver = table
            .entry("webserver")
            .or_insert(toml::Value::Table(toml::Table::new()));
        let Some(webserver) = webserver.as_table_mut() else {
            anyhow::bail!("[webserver] in {} is not a table", config_path.display());
        };
        if webserver.contains_key("priv_key") {
            return Ok(());
        }
        webserver.insert(
            "priv_key".to_string(),
            toml::Value::String(priv_key.to_string()),
        );

        std::fs::write(config_path, toml::to_string_pretty(&table)?)?;
        Ok(())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/marco");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand(value: &str) -> Option<String> {
        match shellexpand::full(value) {
            Ok(expanded) => Some(expanded.into_owned()),
            Err(_) => None,
        }
    }
}
