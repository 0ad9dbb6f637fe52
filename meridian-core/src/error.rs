//! Error codes surfaced on the face
//!
//! None of these is fatal. They are shown on the status line until the
//! next successful refresh and never stop the tick.

use meridian_protocol::{LocationError, TransportError};

/// Why the last refresh did not produce a fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// Companion reported location permission denied
    PermissionDenied,
    /// Companion could not determine a position
    Unavailable,
    /// Companion timed out looking for a position
    AppTimeout,
    TransportTimeout,
    TransportRejected,
    TransportDisconnected,
    TransportAppNotRunning,
    TransportBusy,
    TransportUnknown,
    /// Companion sent coordinates or an offset outside the valid ranges
    InvalidFix,
    /// Request delivered but never answered
    NoReply,
    /// Error flag with a selector this face does not know
    ///
    /// A missing selector is reported as `0`.
    UnknownSelector(i32),
}

impl ErrorCode {
    /// True for failures of the link itself rather than of the lookup
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorCode::TransportTimeout
                | ErrorCode::TransportRejected
                | ErrorCode::TransportDisconnected
                | ErrorCode::TransportAppNotRunning
                | ErrorCode::TransportBusy
                | ErrorCode::TransportUnknown
        )
    }

    /// Short status-line label
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCode::PermissionDenied => "gps: denied",
            ErrorCode::Unavailable => "gps: unavailable",
            ErrorCode::AppTimeout => "gps: timeout",
            ErrorCode::TransportTimeout => "link: timeout",
            ErrorCode::TransportRejected => "link: rejected",
            ErrorCode::TransportDisconnected => "link: no conn",
            ErrorCode::TransportAppNotRunning => "link: no app",
            ErrorCode::TransportBusy => "link: busy",
            ErrorCode::TransportUnknown => "link: error",
            ErrorCode::InvalidFix => "gps: bad fix",
            ErrorCode::NoReply => "gps: no reply",
            ErrorCode::UnknownSelector(_) => "gps: error",
        }
    }
}

impl From<LocationError> for ErrorCode {
    fn from(error: LocationError) -> Self {
        match error {
            LocationError::PermissionDenied => ErrorCode::PermissionDenied,
            LocationError::Unavailable => ErrorCode::Unavailable,
            LocationError::Timeout => ErrorCode::AppTimeout,
            LocationError::Unrecognized(selector) => {
                ErrorCode::UnknownSelector(selector.unwrap_or(0))
            }
        }
    }
}

impl From<TransportError> for ErrorCode {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout => ErrorCode::TransportTimeout,
            TransportError::Rejected => ErrorCode::TransportRejected,
            TransportError::NotConnected => ErrorCode::TransportDisconnected,
            TransportError::AppNotRunning => ErrorCode::TransportAppNotRunning,
            TransportError::Busy => ErrorCode::TransportBusy,
            TransportError::Unknown => ErrorCode::TransportUnknown,
        }
    }
}
