//! Companion link handle used by the watch
//!
//! Sending only queues the dictionary for the link TX task; the delivery
//! outcome comes back later as [`WatchEvent::Delivery`].
//!
//! [`WatchEvent::Delivery`]: crate::channels::WatchEvent::Delivery

use defmt::*;

use meridian_core::traits::CompanionLink;
use meridian_protocol::{Dictionary, TransportError};

use crate::channels::OUTBOX;

/// [`CompanionLink`] backed by the outbox channel
pub struct OutboxLink;

impl CompanionLink for OutboxLink {
    fn send(&mut self, message: &Dictionary) -> Result<(), TransportError> {
        OUTBOX.try_send(message.clone()).map_err(|_| {
            warn!("Outbox full, refusing request");
            TransportError::Busy
        })
    }
}
