//! Build script for meridian-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates clock.toml at compile time
//! - Records the build time as the clock's starting point

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
    write_build_time();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Write `BUILD_UTC`, the Unix time of this build
///
/// The board has no RTC; the clock counts up from here.
fn write_build_time() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("utc.rs")).unwrap();
    write!(
        f,
        "pub const BUILD_UTC: i64 = {};",
        chrono::Utc::now().timestamp()
    )
    .unwrap();
}

/// Integer keys: (name, min, max)
const INT_KEYS: &[(&str, i64, i64)] = &[
    ("refresh_every_minutes", 1, 24 * 60),
    ("stale_after_s", 0, 7 * 24 * 3600),
    ("link_ack_timeout_ms", 100, 60_000),
];

/// Angle keys: (name, min, max)
const ANGLE_KEYS: &[(&str, f64, f64)] = &[
    ("official_zenith_deg", 85.0, 110.0),
    ("civil_zenith_deg", 85.0, 110.0),
];

/// Validate clock.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: clock.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds clock.toml as its default configuration.    ║\n\
            ║  Please create one in the meridian-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read clock.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in clock.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let errors = validate_clock(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in clock.toml                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&errors.join("\n"))
        );
    }

    println!("cargo:warning=clock.toml validated successfully");
}

/// Check the [clock] section against the ranges the firmware accepts
fn validate_clock(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(clock) = config.get("clock").and_then(|v| v.as_table()) else {
        errors.push("Missing [clock] section".to_string());
        return errors;
    };

    for key in clock.keys() {
        let known = INT_KEYS.iter().any(|(name, _, _)| name == key)
            || ANGLE_KEYS.iter().any(|(name, _, _)| name == key);
        if !known {
            errors.push(format!("Unknown key '{}'", key));
        }
    }

    for (name, min, max) in INT_KEYS {
        if let Some(value) = clock.get(*name) {
            match value.as_integer() {
                Some(v) if (*min..=*max).contains(&v) => {}
                Some(v) => errors.push(format!("{} = {} is outside {}..={}", name, v, min, max)),
                None => errors.push(format!("{} must be an integer", name)),
            }
        }
    }

    for (name, min, max) in ANGLE_KEYS {
        if let Some(value) = clock.get(*name) {
            match as_float(value) {
                Some(v) if (*min..=*max).contains(&v) => {}
                Some(v) => errors.push(format!("{} = {} is outside {}..={}", name, v, min, max)),
                None => errors.push(format!("{} must be a number", name)),
            }
        }
    }

    let official = clock.get("official_zenith_deg").and_then(as_float).unwrap_or(90.833);
    let civil = clock.get("civil_zenith_deg").and_then(as_float).unwrap_or(96.0);
    if civil <= official {
        errors.push("civil_zenith_deg must be larger than official_zenith_deg".to_string());
    }

    errors
}

fn as_float(value: &toml::Value) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|v| v as f64))
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
