//! Delivery outcomes of outbound messages
//!
//! The companion bridge answers a dictionary frame with ACK, or with NACK
//! and one result byte. Result bytes follow the AppMessage result codes.

/// Why an outbound message was not delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No acknowledgement in time
    Timeout,
    /// Receiver refused the message
    Rejected,
    /// No connection to the companion
    NotConnected,
    /// Companion app is not running
    AppNotRunning,
    /// Outbox is still busy with a previous message
    Busy,
    /// Any other result code
    Unknown,
}

impl TransportError {
    pub const CODE_TIMEOUT: u8 = 2;
    pub const CODE_REJECTED: u8 = 4;
    pub const CODE_NOT_CONNECTED: u8 = 8;
    pub const CODE_APP_NOT_RUNNING: u8 = 16;
    pub const CODE_BUSY: u8 = 64;
    /// Code used on the wire for [`TransportError::Unknown`]
    pub const CODE_UNKNOWN: u8 = 0xFF;

    pub fn from_result_code(code: u8) -> Self {
        match code {
            Self::CODE_TIMEOUT => TransportError::Timeout,
            Self::CODE_REJECTED => TransportError::Rejected,
            Self::CODE_NOT_CONNECTED => TransportError::NotConnected,
            Self::CODE_APP_NOT_RUNNING => TransportError::AppNotRunning,
            Self::CODE_BUSY => TransportError::Busy,
            _ => TransportError::Unknown,
        }
    }

    pub fn to_result_code(self) -> u8 {
        match self {
            TransportError::Timeout => Self::CODE_TIMEOUT,
            TransportError::Rejected => Self::CODE_REJECTED,
            TransportError::NotConnected => Self::CODE_NOT_CONNECTED,
            TransportError::AppNotRunning => Self::CODE_APP_NOT_RUNNING,
            TransportError::Busy => Self::CODE_BUSY,
            TransportError::Unknown => Self::CODE_UNKNOWN,
        }
    }
}

/// Final state of one outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeliveryOutcome {
    Sent,
    Failed(TransportError),
}

impl DeliveryOutcome {
    /// Interpret a NACK payload
    ///
    /// An empty payload carries no reason.
    pub fn from_nack(payload: &[u8]) -> Self {
        let code = payload.first().copied().unwrap_or(TransportError::CODE_UNKNOWN);
        DeliveryOutcome::Failed(TransportError::from_result_code(code))
    }
}

impl From<TransportError> for DeliveryOutcome {
    fn from(error: TransportError) -> Self {
        DeliveryOutcome::Failed(error)
    }
}
