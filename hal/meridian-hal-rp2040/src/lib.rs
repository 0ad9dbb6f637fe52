//! RP2040-specific HAL for the watch face firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `meridian-hal` traits:
//!
//! - Flash record storage (implements `meridian_hal::RecordStore`)

#![no_std]

pub mod flash;

// Re-export shared traits from meridian-hal for convenience
pub use meridian_hal::{RecordKey, RecordStore as RecordStoreTrait, StoreError};
