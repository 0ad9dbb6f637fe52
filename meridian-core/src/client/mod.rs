//! Location-fetch protocol
//!
//! The client sends a refresh request over a fire-and-forget link and
//! resolves it when the companion replies or the link reports failure.

pub mod location_client;
pub mod machine;

pub use location_client::{ApplyOutcome, LocationClient, RefreshOutcome, MAX_AUX_LEN};
pub use machine::{RequestEvent, RequestState};
