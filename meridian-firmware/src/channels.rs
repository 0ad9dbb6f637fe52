//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Only the controller task touches the watch state; everything else talks
//! to it through these.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use meridian_protocol::{DeliveryOutcome, Dictionary, Frame, LocationReply};

/// Outbound dictionaries waiting for the link TX task
///
/// One request is in flight at a time, so a single slot is enough.
const OUTBOX_SIZE: usize = 1;

/// Channel capacity for events delivered to the controller
const EVENT_CHANNEL_SIZE: usize = 8;

/// Everything the controller reacts to besides the tick
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchEvent {
    /// Dictionary received from the companion
    Reply(LocationReply),
    /// The link finished with the last outbound dictionary
    Delivery(DeliveryOutcome),
    /// Tap button pressed
    Tap,
}

/// Dictionaries queued for the companion
pub static OUTBOX: Channel<CriticalSectionRawMutex, Dictionary, OUTBOX_SIZE> = Channel::new();

/// Events for the controller
pub static WATCH_EVENTS: Channel<CriticalSectionRawMutex, WatchEvent, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// ACK/NACK from the companion: (sequence number, outcome)
pub static DELIVERY: Signal<CriticalSectionRawMutex, (u8, DeliveryOutcome)> = Signal::new();

/// ACK or NACK owed to the companion for an inbound dictionary
pub static ANSWER: Signal<CriticalSectionRawMutex, Frame> = Signal::new();

/// Tick: current Unix time in seconds
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, i64> = Signal::new();
