//! Server configuration file support.
//!
//! Configuration is read from TOML, then selected keys may be overridden from
//! the environment (`HOST`, `PORT`, `GEOCODER_PROVIDER`, `GEOCODER_API_KEY`).
//! Every section and key is optional.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::ephemeris::HouseSystem;
use crate::geocoding::{Gazetteer, Geocoder, GeocoderChain};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ASTRO_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Geocoder setup failed: {0}")]
    Geocoder(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderProvider {
    /// Offline gazetteer only
    #[default]
    Builtin,
    /// OpenCage API only
    OpenCage,
    /// Gazetteer first, then OpenCage when a key is configured
    Chain,
}

impl FromStr for GeocoderProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "builtin" | "gazetteer" => Ok(GeocoderProvider::Builtin),
            "opencage" => Ok(GeocoderProvider::OpenCage),
            "chain" => Ok(GeocoderProvider::Chain),
            _ => Err(ConfigError::InvalidValue {
                key: "geocoder.provider".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for GeocoderProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeocoderProvider::Builtin => "builtin",
            GeocoderProvider::OpenCage => "opencage",
            GeocoderProvider::Chain => "chain",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default)]
    pub provider: GeocoderProvider,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            provider: GeocoderProvider::default(),
            api_key: String::new(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Default house systems per service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(default = "default_subject_house_system")]
    pub subject_house_system: HouseSystem,
    #[serde(default = "default_natal_house_system")]
    pub natal_house_system: HouseSystem,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            subject_house_system: default_subject_house_system(),
            natal_house_system: default_natal_house_system(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_subject_house_system() -> HouseSystem {
    HouseSystem::Placidus
}

fn default_natal_house_system() -> HouseSystem {
    HouseSystem::WholeSign
}

impl FromStr for ServerConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    /// Look for `astro.toml` in the current directory, `backend/`, and the
    /// parent directory. `Ok(None)` when none exists.
    pub fn from_default_location() -> Result<Option<Self>, ConfigError> {
        let search_paths = [
            PathBuf::from("astro.toml"),
            PathBuf::from("backend/astro.toml"),
            PathBuf::from("../astro.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Resolve configuration the way the binaries do: `$ASTRO_CONFIG`, then
    /// the default locations, then built-in defaults; environment overrides
    /// are applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                info!("Loading configuration from {} ({})", path, CONFIG_ENV);
                Self::from_file(path)?
            }
            _ => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `GEOCODER_PROVIDER` and `GEOCODER_API_KEY`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = env_value("HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_value("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(provider) = env_value("GEOCODER_PROVIDER") {
            self.geocoder.provider = provider.parse()?;
        }
        if let Some(key) = env_value("GEOCODER_API_KEY") {
            self.geocoder.api_key = key;
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Build the geocoder selected by `[geocoder]`.
    pub fn build_geocoder(&self) -> Result<Arc<dyn Geocoder>, ConfigError> {
        let settings = &self.geocoder;
        match settings.provider {
            GeocoderProvider::Builtin => Ok(Arc::new(Gazetteer::new())),
            GeocoderProvider::OpenCage => {
                if settings.api_key.trim().is_empty() {
                    return Err(ConfigError::Geocoder(
                        "opencage provider requires geocoder.api_key or GEOCODER_API_KEY"
                            .to_string(),
                    ));
                }
                settings.opencage()
            }
            GeocoderProvider::Chain => {
                let mut chain = GeocoderChain::default();
                chain.push(Arc::new(Gazetteer::new()));
                if settings.api_key.trim().is_empty() {
                    warn!("No geocoder API key set; chain will use the built-in gazetteer only");
                } else {
                    chain.push(settings.opencage()?);
                }
                Ok(Arc::new(chain))
            }
        }
    }
}

impl GeocoderSettings {
    #[cfg(feature = "opencage")]
    fn opencage(&self) -> Result<Arc<dyn Geocoder>, ConfigError> {
        let geocoder = crate::geocoding::OpenCageGeocoder::new(
            self.api_key.clone(),
            self.base_url.clone(),
            std::time::Duration::from_secs(self.timeout_secs),
        )
        .map_err(|e| ConfigError::Geocoder(e.to_string()))?;
        Ok(Arc::new(geocoder))
    }

    #[cfg(not(feature = "opencage"))]
    fn opencage(&self) -> Result<Arc<dyn Geocoder>, ConfigError> {
        Err(ConfigError::Geocoder(
            "built without the `opencage` feature".to_string(),
        ))
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
