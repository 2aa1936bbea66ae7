//! Runtime server configuration.
//!
//! Layered with the `config` crate: defaults, then the optional TOML file,
//! then `PLAINT_*` environment variables (`__` separates nested keys).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub geo:        GeoConfig,
}

/// Settings for the geolocation provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
  pub base_url:   String,
  /// Bound on a single lookup; a slower provider degrades to `"UNKNOWN"`.
  pub timeout_ms: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_owned(),
      port:       8080,
      store_path: PathBuf::from("~/.local/share/plaint/complaints.sqlite"),
      geo:        GeoConfig::default(),
    }
  }
}

impl Default for GeoConfig {
  fn default() -> Self {
    Self {
      base_url:   plaint_geo::DEFAULT_BASE_URL.to_owned(),
      timeout_ms: plaint_core::geo::DEFAULT_LOOKUP_TIMEOUT.as_millis() as u64,
    }
  }
}

impl ServerConfig {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::from_builder(
      Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
          Environment::with_prefix("PLAINT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
        ),
    )
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
    builder
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn lookup_timeout(&self) -> Duration { Duration::from_millis(self.geo.timeout_ms) }
}
