//! Board-agnostic core logic for the Meridian watch face
//!
//! This crate contains all watch logic that does not depend on specific
//! hardware:
//!
//! - Location cache with staleness and write-through persistence
//! - Location-fetch protocol state machine
//! - Solar and lunar ephemeris
//! - Refresh scheduling and stopwatch
//! - Face label formatting
//! - Configuration types and parser
//! - The [`Watch`] controller tying it together

#![no_std]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod face;
pub mod location;
pub mod peripheral;
pub mod scheduler;
pub mod traits;
pub mod watch;

pub use error::ErrorCode;
pub use watch::Watch;
