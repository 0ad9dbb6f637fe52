//! Configuration loading
//!
//! Loads the clock configuration from flash or the embedded defaults.

pub mod loader;

pub use loader::ConfigPersistence;
