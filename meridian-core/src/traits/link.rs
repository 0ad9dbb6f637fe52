//! Outbound side of the companion link

use meridian_protocol::{Dictionary, TransportError};

/// Fire-and-forget message channel to the companion
///
/// `send` only queues the message. Its delivery outcome arrives later as
/// a separate event, or never.
pub trait CompanionLink {
    /// Queue a dictionary for delivery
    ///
    /// An immediate error means the message was not queued at all, e.g.
    /// the outbox is still busy or the link is down.
    fn send(&mut self, message: &Dictionary) -> Result<(), TransportError>;
}
