//! Configuration record persistence
//!
//! The configuration is kept as a postcard blob under
//! [`RecordKey::ClockConfig`].

use meridian_hal::{RecordKey, RecordStore};

use super::types::ClockConfig;
use super::ConfigError;

/// Upper bound of an encoded [`ClockConfig`]
pub const MAX_CONFIG_SIZE: usize = 48;

/// Serialize a configuration into `buffer`
pub fn encode_config<'a>(
    config: &ClockConfig,
    buffer: &'a mut [u8],
) -> Result<&'a mut [u8], ConfigError> {
    postcard::to_slice(config, buffer).map_err(|_| ConfigError::Encode)
}

/// Deserialize and validate a configuration blob
pub fn decode_config(data: &[u8]) -> Result<ClockConfig, ConfigError> {
    let config: ClockConfig = postcard::from_bytes(data).map_err(|_| ConfigError::Decode)?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration record
pub async fn load_config<S: RecordStore>(store: &mut S) -> Result<ClockConfig, ConfigError> {
    let mut buffer = [0u8; MAX_CONFIG_SIZE];
    let len = store.read(RecordKey::ClockConfig, &mut buffer).await?;
    decode_config(&buffer[..len])
}

/// Validate and store the configuration record
pub async fn save_config<S: RecordStore>(
    store: &mut S,
    config: &ClockConfig,
) -> Result<(), ConfigError> {
    config.validate()?;
    let mut buffer = [0u8; MAX_CONFIG_SIZE];
    let encoded = encode_config(config, &mut buffer)?;
    store.write(RecordKey::ClockConfig, encoded).await?;
    Ok(())
}
