//! Location messages exchanged with the companion
//!
//! - Watch → Companion: [`LocationRequest`]
//! - Companion → Watch: [`LocationReply`], classified by [`LocationReply::outcome`]

use heapless::String;

use crate::dictionary::{Dictionary, DictionaryError, MAX_VALUE_SIZE};

// Dictionary keys
pub const KEY_GPS_REQUEST: u32 = 0;
pub const KEY_LAT_RESPONSE: u32 = 1;
pub const KEY_LON_RESPONSE: u32 = 2;
pub const KEY_AUX_RESPONSE: u32 = 3;
pub const KEY_UTC_OFFSET_RESPONSE: u32 = 4;

/// Latitude value the companion sends instead of a position when the
/// lookup failed; the longitude field then carries the error selector
pub const LAT_ERROR_SENTINEL: i32 = 99;

// Error selectors carried in the longitude field
pub const SELECTOR_PERMISSION_DENIED: i32 = 1;
pub const SELECTOR_UNAVAILABLE: i32 = 2;
pub const SELECTOR_TIMEOUT: i32 = 3;

/// Refresh request sent to the companion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocationRequest;

impl LocationRequest {
    /// The request payload is a single fixed tuple
    pub const VALUE: i32 = 1;

    pub fn to_dictionary(&self) -> Result<Dictionary, DictionaryError> {
        let mut dict = Dictionary::new();
        dict.push_int(KEY_GPS_REQUEST, Self::VALUE)?;
        Ok(dict)
    }

    /// Check whether an inbound dictionary is a refresh request
    pub fn matches(dict: &Dictionary) -> bool {
        dict.find_int(KEY_GPS_REQUEST) == Some(Self::VALUE)
    }
}

/// Failure reported by the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LocationError {
    /// User denied location access on the companion
    PermissionDenied,
    /// Position could not be determined
    Unavailable,
    /// Companion gave up waiting for a position
    Timeout,
    /// Error flag with a selector that is missing or not understood
    Unrecognized(Option<i32>),
}

impl LocationError {
    pub fn from_selector(selector: Option<i32>) -> Self {
        match selector {
            Some(SELECTOR_PERMISSION_DENIED) => LocationError::PermissionDenied,
            Some(SELECTOR_UNAVAILABLE) => LocationError::Unavailable,
            Some(SELECTOR_TIMEOUT) => LocationError::Timeout,
            other => LocationError::Unrecognized(other),
        }
    }

    pub fn selector(&self) -> Option<i32> {
        match self {
            LocationError::PermissionDenied => Some(SELECTOR_PERMISSION_DENIED),
            LocationError::Unavailable => Some(SELECTOR_UNAVAILABLE),
            LocationError::Timeout => Some(SELECTOR_TIMEOUT),
            LocationError::Unrecognized(selector) => *selector,
        }
    }
}

/// Fields of a successful reply; each one is independent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixUpdate {
    /// Degrees × 10⁴
    pub latitude: Option<i32>,
    /// Degrees × 10⁴
    pub longitude: Option<i32>,
    /// Local time minus UTC, in minutes
    pub utc_offset_minutes: Option<i32>,
}

/// Classification of a companion reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyOutcome {
    /// At least one position or offset field is present
    Fix(FixUpdate),
    /// Latitude carried the error sentinel
    Failed(LocationError),
    /// No position, offset or error; only resolves the request
    Empty,
}

/// Reply from the companion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocationReply {
    pub latitude: Option<i32>,
    pub longitude: Option<i32>,
    /// Free-form status or accuracy text, display only
    pub aux: Option<String<MAX_VALUE_SIZE>>,
    pub utc_offset_minutes: Option<i32>,
}

impl LocationReply {
    /// Pick the reply fields out of a received dictionary
    ///
    /// Unknown keys and fields of the wrong type are ignored.
    pub fn from_dictionary(dict: &Dictionary) -> Self {
        let aux = dict.find_text(KEY_AUX_RESPONSE).and_then(|text| {
            let mut value = String::new();
            value.push_str(text).ok()?;
            Some(value)
        });

        Self {
            latitude: dict.find_int(KEY_LAT_RESPONSE),
            longitude: dict.find_int(KEY_LON_RESPONSE),
            aux,
            utc_offset_minutes: dict.find_int(KEY_UTC_OFFSET_RESPONSE),
        }
    }

    pub fn to_dictionary(&self) -> Result<Dictionary, DictionaryError> {
        let mut dict = Dictionary::new();
        if let Some(lat) = self.latitude {
            dict.push_int(KEY_LAT_RESPONSE, lat)?;
        }
        if let Some(lon) = self.longitude {
            dict.push_int(KEY_LON_RESPONSE, lon)?;
        }
        if let Some(aux) = &self.aux {
            dict.push_text(KEY_AUX_RESPONSE, aux)?;
        }
        if let Some(offset) = self.utc_offset_minutes {
            dict.push_int(KEY_UTC_OFFSET_RESPONSE, offset)?;
        }
        Ok(dict)
    }

    /// A reply reporting a companion-side failure
    pub fn failure(error: LocationError) -> Self {
        Self {
            latitude: Some(LAT_ERROR_SENTINEL),
            longitude: error.selector(),
            ..Self::default()
        }
    }

    pub fn outcome(&self) -> ReplyOutcome {
        if self.latitude == Some(LAT_ERROR_SENTINEL) {
            return ReplyOutcome::Failed(LocationError::from_selector(self.longitude));
        }

        let update = FixUpdate {
            latitude: self.latitude,
            longitude: self.longitude,
            utc_offset_minutes: self.utc_offset_minutes,
        };

        if update == FixUpdate::default() {
            ReplyOutcome::Empty
        } else {
            ReplyOutcome::Fix(update)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_dictionary() {
        let dict = LocationRequest.to_dictionary().unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.find_int(KEY_GPS_REQUEST), Some(1));
        assert!(LocationRequest::matches(&dict));
    }

    #[test]
    fn test_full_fix() {
        let mut dict = Dictionary::new();
        dict.push_int(KEY_LAT_RESPONSE, 377_749).unwrap();
        dict.push_int(KEY_LON_RESPONSE, -1_224_194).unwrap();
        dict.push_text(KEY_AUX_RESPONSE, "acc 12m").unwrap();
        dict.push_int(KEY_UTC_OFFSET_RESPONSE, -420).unwrap();

        let reply = LocationReply::from_dictionary(&dict);
        assert_eq!(reply.aux.as_deref(), Some("acc 12m"));
        assert_eq!(
            reply.outcome(),
            ReplyOutcome::Fix(FixUpdate {
                latitude: Some(377_749),
                longitude: Some(-1_224_194),
                utc_offset_minutes: Some(-420),
            })
        );
    }

    #[test]
    fn test_partial_fix() {
        let mut dict = Dictionary::new();
        dict.push_int(KEY_UTC_OFFSET_RESPONSE, 60).unwrap();

        let reply = LocationReply::from_dictionary(&dict);
        assert_eq!(
            reply.outcome(),
            ReplyOutcome::Fix(FixUpdate {
                utc_offset_minutes: Some(60),
                ..FixUpdate::default()
            })
        );
    }

    #[test]
    fn test_sentinel_selectors() {
        let cases = [
            (1, LocationError::PermissionDenied),
            (2, LocationError::Unavailable),
            (3, LocationError::Timeout),
            (7, LocationError::Unrecognized(Some(7))),
        ];

        for (selector, expected) in cases {
            let reply = LocationReply {
                latitude: Some(LAT_ERROR_SENTINEL),
                longitude: Some(selector),
                ..LocationReply::default()
            };
            assert_eq!(reply.outcome(), ReplyOutcome::Failed(expected));
        }
    }

    #[test]
    fn test_sentinel_without_selector() {
        let reply = LocationReply {
            latitude: Some(LAT_ERROR_SENTINEL),
            ..LocationReply::default()
        };
        assert_eq!(
            reply.outcome(),
            ReplyOutcome::Failed(LocationError::Unrecognized(None))
        );
    }

    #[test]
    fn test_empty_and_aux_only() {
        assert_eq!(LocationReply::default().outcome(), ReplyOutcome::Empty);

        let mut dict = Dictionary::new();
        dict.push_text(KEY_AUX_RESPONSE, "searching").unwrap();
        let reply = LocationReply::from_dictionary(&dict);
        assert_eq!(reply.outcome(), ReplyOutcome::Empty);
        assert_eq!(reply.aux.as_deref(), Some("searching"));
    }

    #[test]
    fn test_failure_reply_through_wire() {
        let dict = LocationReply::failure(LocationError::Unavailable)
            .to_dictionary()
            .unwrap();

        let mut buffer = [0u8; 64];
        let len = dict.encode(&mut buffer).unwrap();
        let decoded = Dictionary::decode(&buffer[..len]).unwrap();

        assert_eq!(
            LocationReply::from_dictionary(&decoded).outcome(),
            ReplyOutcome::Failed(LocationError::Unavailable)
        );
    }

    #[test]
    fn test_wrong_type_field_ignored() {
        let mut dict = Dictionary::new();
        dict.push_text(KEY_LAT_RESPONSE, "99").unwrap();
        dict.push_int(KEY_AUX_RESPONSE, 5).unwrap();

        let reply = LocationReply::from_dictionary(&dict);
        assert_eq!(reply.latitude, None);
        assert_eq!(reply.aux, None);
        assert_eq!(reply.outcome(), ReplyOutcome::Empty);
    }
}
