//! Location cache
//!
//! Holds the last known fix, decides when it is stale, and persists it
//! write-through to the record store.

pub mod fix;
pub mod store;

pub use fix::{LocationFix, DEG_SCALE, LAT_RANGE, LON_RANGE, UTC_OFFSET_RANGE};
pub use store::LocationStore;
