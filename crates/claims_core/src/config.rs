//! Temporal configuration

use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration for the date adapters seeded into a registry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Whether the timezone-aware chrono family should be offered
    pub extended_time: bool,
    /// IANA zone used when widening instants, instead of the process default
    pub default_zone: Option<String>,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            extended_time: true,
            default_zone: None,
        }
    }
}

impl TemporalConfig {
    /// Loads configuration from `JWT_CLAIMS_*` environment variables
    ///
    /// For example `JWT_CLAIMS_DEFAULT_ZONE=Europe/Paris` or
    /// `JWT_CLAIMS_EXTENDED_TIME=false`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(config::Environment::with_prefix("JWT_CLAIMS").try_parsing(true))
    }

    /// Loads configuration from an arbitrary `config` source
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Sets the zone used when widening instants
    pub fn with_default_zone(mut self, zone: impl Into<String>) -> Self {
        self.default_zone = Some(zone.into());
        self
    }

    /// Restricts the registry to the legacy adapter
    pub fn legacy_only(mut self) -> Self {
        self.extended_time = false;
        self
    }
}
