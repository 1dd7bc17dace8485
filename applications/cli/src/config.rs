/// CLI configuration
use crate::error::{CliError, Result};
use cadence_playback::PlaybackConfig;
use cadence_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://./data/cadence.db".to_string()
}

impl CadenceConfig {
    /// Load configuration from `cadence.toml` and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from `path` (if it exists) and environment
    ///
    /// Environment variables override the file, e.g.
    /// `CADENCE_STORAGE__DATABASE_URL` or `CADENCE_PLAYBACK__VOLUME`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(CliError::Config(
                "database URL is required (set CADENCE_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        let playback = &self.playback;
        if !(0.0..=1.0).contains(&playback.volume) {
            return Err(CliError::Config(format!(
                "playback.volume must be between 0 and 1, got {}",
                playback.volume
            )));
        }

        if !(0.5..=2.0).contains(&playback.playback_rate) {
            return Err(CliError::Config(format!(
                "playback.playback_rate must be between 0.5 and 2.0, got {}",
                playback.playback_rate
            )));
        }

        if !playback.skip_interval_secs.is_finite() || playback.skip_interval_secs <= 0.0 {
            return Err(CliError::Config(
                "playback.skip_interval_secs must be positive".to_string(),
            ));
        }

        if !playback.restart_threshold_secs.is_finite() || playback.restart_threshold_secs < 0.0 {
            return Err(CliError::Config(
                "playback.restart_threshold_secs must not be negative".to_string(),
            ));
        }

        if self.resolver.cache_capacity == 0 {
            return Err(CliError::Config(
                "resolver.cache_capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}
