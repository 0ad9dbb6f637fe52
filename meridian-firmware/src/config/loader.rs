//! Configuration persistence
//!
//! Loads the clock configuration record from flash.
//! Falls back to the embedded `clock.toml` if flash holds none.

use defmt::*;

use meridian_core::config::{load_config, parse_clock_config, ClockConfig, ConfigError};
use meridian_hal::{RecordStore, StoreError};

/// Embedded default configuration (compiled into firmware)
/// Edit clock.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../clock.toml");

/// Configuration persistence manager
pub struct ConfigPersistence<S> {
    storage: S,
}

impl<S: RecordStore> ConfigPersistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Hand the storage back so the location cache can use it
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Load the configuration, never failing
    ///
    /// A missing or invalid flash record falls back to the embedded
    /// defaults.
    pub async fn load(&mut self) -> ClockConfig {
        info!("Loading configuration from flash...");

        match load_config(&mut self.storage).await {
            Ok(config) => {
                info!("Loaded configuration from flash");
                log_config_summary(&config);
                config
            }
            Err(ConfigError::Store(StoreError::NotFound)) => {
                debug!("No configuration record, using embedded defaults");
                embedded_default()
            }
            Err(e) => {
                warn!("Configuration record unusable: {:?}, using embedded defaults", e);
                embedded_default()
            }
        }
    }
}

/// Parse the embedded clock.toml
///
/// The build script already validated it; the built-in defaults only
/// apply if the two ever disagree.
pub fn embedded_default() -> ClockConfig {
    match parse_clock_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            log_config_summary(&config);
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            ClockConfig::default()
        }
    }
}

fn log_config_summary(config: &ClockConfig) {
    info!(
        "Config: refresh every {} min, stale after {} s, ack timeout {} ms",
        config.refresh_every_minutes, config.stale_after_s, config.link_ack_timeout_ms
    );
}
