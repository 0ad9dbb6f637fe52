//! Minimal `key = value` parser for `clock.toml`
//!
//! Handles only the subset the clock configuration uses:
//! - a single optional `[clock]` section header
//! - `key = value` pairs with integer or decimal values
//! - `#` comments, whole-line or trailing
//!
//! Keys that are not present keep their default value.

use core::str::FromStr;

use super::types::ClockConfig;
use super::ConfigError;

/// Name of the only accepted section
pub const SECTION: &str = "clock";

/// Parse a configuration file and validate the result
pub fn parse_clock_config(input: &str) -> Result<ClockConfig, ConfigError> {
    let mut config = ClockConfig::default();

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(ConfigError::InvalidLine)?
                .trim();
            if name != SECTION {
                return Err(ConfigError::UnknownSection);
            }
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ConfigError::InvalidLine)?;
        apply(&mut config, key.trim(), value.trim())?;
    }

    config.validate()?;
    Ok(config)
}

fn apply(config: &mut ClockConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "refresh_every_minutes" => config.refresh_every_minutes = number(value)?,
        "stale_after_s" => config.stale_after_s = number(value)?,
        "official_zenith_deg" => config.official_zenith_deg = number(value)?,
        "civil_zenith_deg" => config.civil_zenith_deg = number(value)?,
        "link_ack_timeout_ms" => config.link_ack_timeout_ms = number(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn number<T: FromStr>(value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
