//! Companion Link Protocol
//!
//! This crate defines the message protocol between the watch and its
//! companion device (the phone side that owns GPS and the timezone
//! database). The link is asynchronous and fire-and-forget: the watch sends
//! a request, the companion answers later, or never.
//!
//! # Protocol Overview
//!
//! Application messages are keyed tuple dictionaries. On the wire each
//! dictionary travels inside a link frame:
//! ```text
//! ┌───────┬────────┬──────┬─────┬─────────────┬───────┐
//! │ START │ LENGTH │ KIND │ SEQ │ PAYLOAD     │ CRC-8 │
//! │ 1B    │ 1B     │ 1B   │ 1B  │ 0–240B      │ 1B    │
//! └───────┴────────┴──────┴─────┴─────────────┴───────┘
//! ```
//!
//! The receiving side answers every dictionary frame with an ACK or a NACK
//! carrying a transport result code, which the sender turns into a
//! [`DeliveryOutcome`].

#![no_std]
#![deny(unsafe_code)]

pub mod dictionary;
pub mod frame;
pub mod messages;
pub mod transport;

pub use dictionary::{Dictionary, DictionaryError, Tuple, TupleValue};
pub use frame::{Frame, FrameError, FrameKind, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{FixUpdate, LocationError, LocationReply, LocationRequest, ReplyOutcome};
pub use transport::{DeliveryOutcome, TransportError};
