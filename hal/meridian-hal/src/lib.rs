//! Meridian Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the watch face logic
//! depends on. Chip-specific HALs implement them so the same core code runs
//! on every board (and on the host, against [`memory::MemoryStore`]).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (meridian-firmware, etc.)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  meridian-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ meridian-hal- │       │  MemoryStore  │
//! │    rp2040     │       │  (host/RAM)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`flash::RecordStore`] - Persistent key-value records

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod memory;

// Re-export key types at crate root for convenience
pub use flash::{RecordKey, RecordStore, StoreError};
pub use memory::MemoryStore;
