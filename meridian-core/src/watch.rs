//! Watch controller
//!
//! Owns all watch state and exposes one handler per external event. The
//! caller runs a single event loop and awaits each handler before the
//! next, so no state is shared or locked.

use chrono::{DateTime, NaiveDateTime};
use meridian_hal::RecordStore;
use meridian_protocol::{LocationReply, TransportError};

use crate::client::{ApplyOutcome, LocationClient, RefreshOutcome, RequestState};
use crate::config::ClockConfig;
use crate::ephemeris::EphemerisResult;
use crate::error::ErrorCode;
use crate::face::{FaceInputs, FaceView};
use crate::location::{LocationFix, LocationStore};
use crate::peripheral::PeripheralStatus;
use crate::scheduler::{RefreshPolicy, Stopwatch, TimeUnits};
use crate::traits::{CompanionLink, Presenter};

/// Watch face state and event handlers
pub struct Watch<S> {
    config: ClockConfig,
    client: LocationClient,
    store: LocationStore<S>,
    refresh: RefreshPolicy,
    stopwatch: Stopwatch,
    peripherals: PeripheralStatus,
}

impl<S: RecordStore> Watch<S> {
    /// Load the persisted fix and build the watch
    pub async fn load(store: S, config: ClockConfig, now: i64) -> Self {
        let mut store = LocationStore::new(store);
        let fix = store.load().await;

        Self {
            refresh: RefreshPolicy::new(config.refresh_every_minutes),
            config,
            client: LocationClient::new(fix),
            store,
            stopwatch: Stopwatch::new(now),
            peripherals: PeripheralStatus::default(),
        }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn fix(&self) -> &LocationFix {
        self.client.fix()
    }

    pub fn request_state(&self) -> RequestState {
        self.client.state()
    }

    pub fn last_error(&self) -> Option<ErrorCode> {
        self.client.last_error()
    }

    pub fn peripherals(&self) -> &PeripheralStatus {
        &self.peripherals
    }

    /// Underlying record store
    pub fn store_mut(&mut self) -> &mut S {
        self.store.store_mut()
    }

    /// Initial refresh and first frame
    pub fn start<L, P>(&mut self, now: i64, link: &mut L, presenter: &mut P) -> RefreshOutcome
    where
        L: CompanionLink,
        P: Presenter,
    {
        let outcome = self.client.trigger_refresh(link, now);
        self.present(now, presenter);
        outcome
    }

    /// Periodic tick
    ///
    /// Redraws on every tick and sends a refresh request on every
    /// `refresh_every_minutes`-th minute boundary. Returns the refresh
    /// outcome when one was due.
    ///
    /// An outstanding request at least one refresh interval old is
    /// abandoned with [`ErrorCode::NoReply`] and replaced; a younger one
    /// suppresses the refresh.
    pub fn on_tick<L, P>(
        &mut self,
        now: i64,
        units: TimeUnits,
        link: &mut L,
        presenter: &mut P,
    ) -> Option<RefreshOutcome>
    where
        L: CompanionLink,
        P: Presenter,
    {
        let outcome = if self.refresh.on_tick(units) {
            let max_wait_s = u32::from(self.refresh.every_minutes()) * 60;
            self.client.expire_outstanding(now, max_wait_s);
            Some(self.client.trigger_refresh(link, now))
        } else {
            None
        };
        self.present(now, presenter);
        outcome
    }

    /// Reply from the companion
    pub async fn on_reply<P: Presenter>(
        &mut self,
        reply: &LocationReply,
        now: i64,
        presenter: &mut P,
    ) -> ApplyOutcome {
        let outcome = self.client.on_reply(reply, now, &mut self.store).await;
        self.present(now, presenter);
        outcome
    }

    /// Link confirmed delivery of the request
    pub fn on_sent(&mut self) {
        self.client.on_sent();
    }

    /// Link gave up on the request
    pub fn on_transport_failure<P: Presenter>(
        &mut self,
        error: TransportError,
        now: i64,
        presenter: &mut P,
    ) -> ErrorCode {
        let code = self.client.on_transport_failure(error);
        self.present(now, presenter);
        code
    }

    /// Tap: restart the stopwatch
    pub fn on_tap<P: Presenter>(&mut self, now: i64, presenter: &mut P) {
        self.stopwatch.reset(now);
        self.present(now, presenter);
    }

    pub fn on_battery<P: Presenter>(
        &mut self,
        percent: u8,
        charging: bool,
        now: i64,
        presenter: &mut P,
    ) {
        self.peripherals.set_battery(percent, charging);
        self.present(now, presenter);
    }

    pub fn on_connection<P: Presenter>(&mut self, connected: bool, now: i64, presenter: &mut P) {
        self.peripherals.set_connected(connected);
        self.present(now, presenter);
    }

    /// Wall time in the fix's timezone
    pub fn local_time(&self, now: i64) -> NaiveDateTime {
        let offset_s = self.client.fix().utc_offset_minutes as i64 * 60;
        DateTime::from_timestamp(now.saturating_add(offset_s), 0)
            .unwrap_or_default()
            .naive_utc()
    }

    /// Compute the face for `now`
    pub fn view(&self, now: i64) -> FaceView {
        let local = self.local_time(now);
        let fix = self.client.fix();
        let ephemeris = EphemerisResult::compute(local.date(), fix, &self.config);
        let status = match self.client.last_error() {
            Some(code) => Some(code.label()),
            None => self.client.aux(),
        };

        FaceView::compose(&FaceInputs {
            local,
            fix,
            stale: fix.is_stale(now, self.config.stale_after_s),
            ephemeris: &ephemeris,
            stopwatch_elapsed_s: self.stopwatch.elapsed(now),
            status,
            peripherals: &self.peripherals,
        })
    }

    fn present<P: Presenter>(&self, now: i64, presenter: &mut P) {
        presenter.present(&self.view(now));
    }
}
