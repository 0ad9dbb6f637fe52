//! Location client
//!
//! Drives the refresh protocol with the companion and owns the last known
//! fix. Failures are transient: nothing is retried until the next
//! scheduled refresh. A request the companion never answers is given up
//! once it is a full refresh interval old.

use heapless::String;
use meridian_hal::RecordStore;
use meridian_protocol::{LocationReply, LocationRequest, ReplyOutcome, TransportError};

use super::machine::{RequestEvent, RequestState};
use crate::error::ErrorCode;
use crate::location::{LocationFix, LocationStore};
use crate::traits::CompanionLink;

/// Maximum length of the companion's status text
pub const MAX_AUX_LEN: usize = 32;

/// Result of [`LocationClient::trigger_refresh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshOutcome {
    /// Request queued on the link
    Sent,
    /// A request is already outstanding
    Suppressed,
    /// The link refused the request
    Failed(ErrorCode),
}

/// Result of applying a companion reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApplyOutcome {
    /// Fix updated in memory; `persisted` is false if the store write failed
    Updated { persisted: bool },
    /// Reply carried an error or an unusable fix
    Failed(ErrorCode),
    /// Reply carried nothing to apply
    Empty,
}

/// Location client
#[derive(Debug, Clone, Default)]
pub struct LocationClient {
    state: RequestState,
    fix: LocationFix,
    last_error: Option<ErrorCode>,
    aux: Option<String<MAX_AUX_LEN>>,
    /// Unix time the outstanding request was handed to the link
    sent_at: i64,
}

impl LocationClient {
    /// Create a client starting from a loaded fix
    pub fn new(fix: LocationFix) -> Self {
        Self {
            fix,
            ..Self::default()
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn fix(&self) -> &LocationFix {
        &self.fix
    }

    /// Error of the most recent refresh, cleared by the next success
    pub fn last_error(&self) -> Option<ErrorCode> {
        self.last_error
    }

    /// Status text from the most recent reply
    pub fn aux(&self) -> Option<&str> {
        self.aux.as_deref()
    }

    /// Ask the companion for a new fix
    ///
    /// Does nothing while a request is outstanding.
    pub fn trigger_refresh<L: CompanionLink>(
        &mut self,
        link: &mut L,
        now: i64,
    ) -> RefreshOutcome {
        if self.state.is_awaiting() {
            return RefreshOutcome::Suppressed;
        }

        let sent = LocationRequest
            .to_dictionary()
            .map_err(|_| TransportError::Unknown)
            .and_then(|dict| link.send(&dict));

        match sent {
            Ok(()) => {
                self.state = self.state.transition(RequestEvent::RequestSent);
                self.sent_at = now;
                RefreshOutcome::Sent
            }
            Err(error) => {
                // Refused before it left: same as a failed delivery
                self.state = self.state.transition(RequestEvent::RequestSent);
                RefreshOutcome::Failed(self.on_transport_failure(error))
            }
        }
    }

    /// Give up on a request unanswered for at least `max_wait_s`
    ///
    /// Returns the recorded error if the request was abandoned. A reply
    /// arriving later is still applied.
    pub fn expire_outstanding(&mut self, now: i64, max_wait_s: u32) -> Option<ErrorCode> {
        if !self.state.is_awaiting() || now.saturating_sub(self.sent_at) < max_wait_s as i64 {
            return None;
        }

        self.state = self.state.transition(RequestEvent::ReplyOverdue);
        self.last_error = Some(ErrorCode::NoReply);
        Some(ErrorCode::NoReply)
    }

    /// The link delivered the request
    pub fn on_sent(&mut self) {
        self.state = self.state.transition(RequestEvent::DeliveryConfirmed);
    }

    /// The link gave up on the request
    pub fn on_transport_failure(&mut self, error: TransportError) -> ErrorCode {
        let code = ErrorCode::from(error);
        self.state = self.state.transition(RequestEvent::TransportFailed);
        self.last_error = Some(code);
        code
    }

    /// Apply a reply from the companion and persist any new fix
    pub async fn on_reply<S: RecordStore>(
        &mut self,
        reply: &LocationReply,
        now: i64,
        store: &mut LocationStore<S>,
    ) -> ApplyOutcome {
        self.state = self.state.transition(RequestEvent::ReplyReceived);
        self.aux = reply.aux.as_deref().map(|text| {
            let mut aux = String::new();
            // Keep as much as fits on a character boundary
            for c in text.chars() {
                if aux.push(c).is_err() {
                    break;
                }
            }
            aux
        });

        match reply.outcome() {
            ReplyOutcome::Fix(update) => match self.fix.apply(&update, now) {
                Ok(()) => {
                    self.last_error = None;
                    let persisted = store.persist(&self.fix).await.is_ok();
                    ApplyOutcome::Updated { persisted }
                }
                Err(code) => {
                    self.last_error = Some(code);
                    ApplyOutcome::Failed(code)
                }
            },
            ReplyOutcome::Failed(error) => {
                let code = ErrorCode::from(error);
                self.last_error = Some(code);
                ApplyOutcome::Failed(code)
            }
            ReplyOutcome::Empty => ApplyOutcome::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use heapless::Vec;
    use meridian_hal::{MemoryStore, RecordKey};
    use meridian_protocol::{Dictionary, LocationError};

    #[derive(Default)]
    struct RecordingLink {
        sent: Vec<Dictionary, 4>,
        refuse: Option<TransportError>,
    }

    impl CompanionLink for RecordingLink {
        fn send(&mut self, message: &Dictionary) -> Result<(), TransportError> {
            if let Some(error) = self.refuse {
                return Err(error);
            }
            self.sent.push(message.clone()).map_err(|_| TransportError::Busy)
        }
    }

    fn fix_reply(lat: i32, lon: i32, offset: i32) -> LocationReply {
        LocationReply {
            latitude: Some(lat),
            longitude: Some(lon),
            utc_offset_minutes: Some(offset),
            aux: None,
        }
    }

    fn error_reply(selector: i32) -> LocationReply {
        LocationReply {
            latitude: Some(99),
            longitude: Some(selector),
            ..LocationReply::default()
        }
    }

    #[test]
    fn test_refresh_sends_request() {
        let mut client = LocationClient::default();
        let mut link = RecordingLink::default();

        assert_eq!(client.trigger_refresh(&mut link, 0), RefreshOutcome::Sent);
        assert_eq!(client.state(), RequestState::AwaitingResponse);
        assert_eq!(link.sent.len(), 1);
        assert!(LocationRequest::matches(&link.sent[0]));
    }

    #[test]
    fn test_overlapping_refresh_suppressed() {
        let mut client = LocationClient::default();
        let mut link = RecordingLink::default();
        let mut store = LocationStore::new(MemoryStore::new());

        client.trigger_refresh(&mut link, 0);
        client.on_sent();
        assert_eq!(client.trigger_refresh(&mut link, 0), RefreshOutcome::Suppressed);
        assert_eq!(link.sent.len(), 1);

        block_on(client.on_reply(&LocationReply::default(), 0, &mut store));
        assert_eq!(client.trigger_refresh(&mut link, 0), RefreshOutcome::Sent);
        assert_eq!(link.sent.len(), 2);
    }

    #[test]
    fn test_unanswered_request_expires() {
        let mut client = LocationClient::default();
        let mut link = RecordingLink::default();

        client.trigger_refresh(&mut link, 1_000);
        client.on_sent();

        assert_eq!(client.expire_outstanding(1_299, 300), None);
        assert!(client.state().is_awaiting());

        assert_eq!(client.expire_outstanding(1_300, 300), Some(ErrorCode::NoReply));
        assert_eq!(client.state(), RequestState::Idle);
        assert_eq!(client.last_error(), Some(ErrorCode::NoReply));
        assert_eq!(client.fix(), &LocationFix::default());
        assert_eq!(client.trigger_refresh(&mut link, 1_300), RefreshOutcome::Sent);
        assert_eq!(link.sent.len(), 2);
    }

    #[test]
    fn test_expire_ignores_idle_client() {
        let mut client = LocationClient::default();
        assert_eq!(client.expire_outstanding(10_000, 300), None);
        assert_eq!(client.last_error(), None);
    }

    #[test]
    fn test_late_reply_after_expiry_still_applies() {
        let mut client = LocationClient::default();
        let mut link = RecordingLink::default();
        let mut store = LocationStore::new(MemoryStore::new());

        client.trigger_refresh(&mut link, 0);
        client.expire_outstanding(300, 300);

        let outcome = block_on(client.on_reply(&fix_reply(1, 2, 0), 301, &mut store));
        assert_eq!(outcome, ApplyOutcome::Updated { persisted: true });
        assert_eq!(client.last_error(), None);
    }

    #[test]
    fn test_transport_failure_allows_next_refresh() {
        let mut client = LocationClient::default();
        let mut link = RecordingLink::default();

        client.trigger_refresh(&mut link, 0);
        let code = client.on_transport_failure(TransportError::Timeout);

        assert_eq!(code, ErrorCode::TransportTimeout);
        assert_eq!(client.last_error(), Some(ErrorCode::TransportTimeout));
        assert_eq!(client.state(), RequestState::Idle);
        assert_eq!(client.fix(), &LocationFix::default());
        assert_eq!(client.trigger_refresh(&mut link, 0), RefreshOutcome::Sent);
    }

    #[test]
    fn test_synchronous_refusal() {
        let mut client = LocationClient::default();
        let mut link = RecordingLink {
            refuse: Some(TransportError::Busy),
            ..RecordingLink::default()
        };

        assert_eq!(
            client.trigger_refresh(&mut link, 0),
            RefreshOutcome::Failed(ErrorCode::TransportBusy)
        );
        assert_eq!(client.state(), RequestState::Idle);
    }

    #[test]
    fn test_successful_reply_updates_and_persists() {
        let mut client = LocationClient::default();
        let mut link = RecordingLink::default();
        let mut store = LocationStore::new(MemoryStore::new());

        client.trigger_refresh(&mut link, 0);
        let outcome = block_on(client.on_reply(
            &fix_reply(377_749, -1_224_194, -420),
            1_718_900_000,
            &mut store,
        ));

        assert_eq!(outcome, ApplyOutcome::Updated { persisted: true });
        assert_eq!(client.state(), RequestState::Idle);
        assert_eq!(client.fix().lat_x10000, 377_749);
        assert_eq!(client.fix().utc_offset_minutes, -420);
        assert_eq!(client.fix().last_updated, 1_718_900_000);
        assert!(client.fix().has_ever_succeeded);

        let inner = store.store_mut();
        assert_eq!(block_on(inner.read_int(RecordKey::Latitude)), Ok(377_749));
        assert_eq!(block_on(inner.read_int(RecordKey::Longitude)), Ok(-1_224_194));
        assert_eq!(block_on(inner.read_int(RecordKey::UtcOffset)), Ok(-420));
    }

    #[test]
    fn test_sentinel_replies_leave_fix_untouched() {
        let cases = [
            (1, ErrorCode::PermissionDenied),
            (2, ErrorCode::Unavailable),
            (3, ErrorCode::AppTimeout),
            (42, ErrorCode::UnknownSelector(42)),
        ];

        for (selector, expected) in cases {
            let start = LocationFix {
                lat_x10000: 100,
                lon_x10000: 200,
                ..LocationFix::default()
            };
            let mut client = LocationClient::new(start);
            let mut store = LocationStore::new(MemoryStore::new());

            let outcome = block_on(client.on_reply(&error_reply(selector), 5, &mut store));

            assert_eq!(outcome, ApplyOutcome::Failed(expected));
            assert_eq!(client.last_error(), Some(expected));
            assert_eq!(client.fix(), &start);
            assert_eq!(store.store_mut().write_count(), 0);
        }
    }

    #[test]
    fn test_success_clears_error() {
        let mut client = LocationClient::default();
        let mut store = LocationStore::new(MemoryStore::new());

        block_on(client.on_reply(
            &LocationReply::failure(LocationError::Unavailable),
            1,
            &mut store,
        ));
        assert!(client.last_error().is_some());

        block_on(client.on_reply(&fix_reply(1, 2, 0), 2, &mut store));
        assert_eq!(client.last_error(), None);
    }

    #[test]
    fn test_out_of_range_reply_rejected() {
        let mut client = LocationClient::default();
        let mut store = LocationStore::new(MemoryStore::new());

        let outcome = block_on(client.on_reply(&fix_reply(0, 0, 900), 1, &mut store));
        assert_eq!(outcome, ApplyOutcome::Failed(ErrorCode::InvalidFix));
        assert!(!client.fix().has_ever_succeeded);
    }

    #[test]
    fn test_persist_failure_keeps_memory_fix() {
        let mut inner = MemoryStore::new();
        inner.set_fail_writes(true);
        let mut store = LocationStore::new(inner);
        let mut client = LocationClient::default();

        let outcome = block_on(client.on_reply(&fix_reply(10, 20, 30), 7, &mut store));
        assert_eq!(outcome, ApplyOutcome::Updated { persisted: false });
        assert_eq!(client.fix().lat_x10000, 10);
    }

    #[test]
    fn test_empty_reply_resolves_request() {
        let mut client = LocationClient::default();
        let mut link = RecordingLink::default();
        let mut store = LocationStore::new(MemoryStore::new());

        client.trigger_refresh(&mut link, 0);
        let mut aux = heapless::String::new();
        aux.push_str("searching").unwrap();
        let reply = LocationReply {
            aux: Some(aux),
            ..LocationReply::default()
        };

        let outcome = block_on(client.on_reply(&reply, 3, &mut store));
        assert_eq!(outcome, ApplyOutcome::Empty);
        assert_eq!(client.state(), RequestState::Idle);
        assert_eq!(client.aux(), Some("searching"));
        assert_eq!(client.fix(), &LocationFix::default());
    }
}
