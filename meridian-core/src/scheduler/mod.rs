//! Tick scheduling
//!
//! Decides when to ask the companion for a new fix and keeps the
//! stopwatch. The face itself is recomputed on every tick.

pub mod refresh;
pub mod stopwatch;
pub mod units;

pub use refresh::RefreshPolicy;
pub use stopwatch::Stopwatch;
pub use units::TimeUnits;
