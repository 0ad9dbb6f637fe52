//! Main controller task
//!
//! Owns the [`Watch`] and is the only task that touches it. Ticks and
//! watch events are handled one at a time, each to completion.

use defmt::*;
use embassy_futures::select::{select, Either};

use meridian_core::client::{ApplyOutcome, RefreshOutcome};
use meridian_core::scheduler::TimeUnits;
use meridian_core::Watch;
use meridian_hal_rp2040::flash::RecordStore;
use meridian_protocol::DeliveryOutcome;

use crate::channels::{WatchEvent, TICK_SIGNAL, WATCH_EVENTS};
use crate::clock::unix_now;
use crate::link::OutboxLink;
use crate::presenter::LogPresenter;

pub type FirmwareWatch = Watch<RecordStore<'static>>;

#[embassy_executor::task]
pub async fn controller_task(mut watch: FirmwareWatch) {
    info!("Controller task started");

    let mut link = OutboxLink;
    let mut presenter = LogPresenter::new();

    let now = unix_now();
    log_refresh(watch.start(now, &mut link, &mut presenter));
    let mut last_local = watch.local_time(now);

    loop {
        match select(TICK_SIGNAL.wait(), WATCH_EVENTS.receive()).await {
            Either::First(now) => {
                let local = watch.local_time(now);
                let units = TimeUnits::changed_between(last_local, local);
                last_local = local;

                if let Some(outcome) = watch.on_tick(now, units, &mut link, &mut presenter) {
                    log_refresh(outcome);
                }
            }
            Either::Second(event) => {
                handle_event(&mut watch, event, &mut presenter).await;
            }
        }
    }
}

async fn handle_event(watch: &mut FirmwareWatch, event: WatchEvent, presenter: &mut LogPresenter) {
    let now = unix_now();

    match event {
        WatchEvent::Reply(reply) => match watch.on_reply(&reply, now, presenter).await {
            ApplyOutcome::Updated { persisted: true } => {
                info!("Fix updated: {:?}", watch.fix());
            }
            ApplyOutcome::Updated { persisted: false } => {
                warn!("Fix updated but not persisted: {:?}", watch.fix());
            }
            ApplyOutcome::Failed(code) => {
                warn!("Location request failed: {}", code.label());
            }
            ApplyOutcome::Empty => {
                debug!("Reply carried no fields");
            }
        },
        WatchEvent::Delivery(DeliveryOutcome::Sent) => {
            trace!("Request delivered");
            watch.on_sent();
        }
        WatchEvent::Delivery(DeliveryOutcome::Failed(error)) => {
            let code = watch.on_transport_failure(error, now, presenter);
            warn!("Request not delivered: {}", code.label());
        }
        WatchEvent::Tap => {
            watch.on_tap(now, presenter);
        }
    }
}

fn log_refresh(outcome: RefreshOutcome) {
    match outcome {
        RefreshOutcome::Sent => debug!("Location refresh requested"),
        RefreshOutcome::Suppressed => debug!("Refresh skipped, request outstanding"),
        RefreshOutcome::Failed(code) => warn!("Refresh refused: {}", code.label()),
    }
}
