//! Clock configuration
//!
//! Defaults come from `clock.toml`, embedded at build time and parsed by
//! [`parse_clock_config`]. A configuration record in flash, when present
//! and valid, takes precedence.

pub mod parser;
#[cfg(feature = "serde")]
pub mod store;
pub mod types;

use meridian_hal::StoreError;

pub use parser::parse_clock_config;
#[cfg(feature = "serde")]
pub use store::{decode_config, encode_config, load_config, save_config};
pub use types::*;

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Line is neither a section header nor `key = value`
    InvalidLine,
    /// Section other than `[clock]`
    UnknownSection,
    /// Key not known to the clock configuration
    UnknownKey,
    /// Value does not parse as the key's type
    InvalidValue,
    /// Value parses but lies outside the accepted range
    OutOfRange,
    /// Binary encoding failed
    Encode,
    /// Binary record does not decode
    Decode,
    /// Record storage failed
    Store(StoreError),
}

impl From<StoreError> for ConfigError {
    fn from(e: StoreError) -> Self {
        ConfigError::Store(e)
    }
}
