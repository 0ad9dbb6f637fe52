//! Companion UART transmit task
//!
//! The transport layer of the companion link. Frames each outbound
//! dictionary, waits for the companion's ACK or NACK, and reports the
//! delivery outcome to the controller. No ACK within the configured
//! timeout is a transport timeout.
//!
//! ACKs owed for inbound dictionaries are written in between, including
//! while an outbound request waits.

use defmt::*;
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Instant, Timer};
use embedded_io_async::Write;

use meridian_protocol::frame::MAX_FRAME_SIZE;
use meridian_protocol::{
    DeliveryOutcome, Dictionary, Frame, FrameKind, TransportError, MAX_PAYLOAD_SIZE,
};

use crate::channels::{WatchEvent, ANSWER, DELIVERY, OUTBOX, WATCH_EVENTS};

#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx, ack_timeout_ms: u32) {
    info!("Link TX task started");

    let ack_timeout = Duration::from_millis(ack_timeout_ms as u64);
    let mut seq: u8 = 0;

    loop {
        match select(OUTBOX.receive(), ANSWER.wait()).await {
            Either::First(message) => {
                seq = seq.wrapping_add(1);
                let outcome = deliver(&mut tx, seq, &message, ack_timeout).await;
                debug!("Delivery {}: {:?}", seq, outcome);
                if WATCH_EVENTS.try_send(WatchEvent::Delivery(outcome)).is_err() {
                    warn!("Event channel full, dropping delivery outcome");
                }
            }
            Either::Second(answer) => {
                if let Err(e) = write_frame(&mut tx, &answer).await {
                    warn!("Answer {} not sent: {:?}", answer.seq, e);
                }
            }
        }
    }
}

/// Send one dictionary and wait for its ACK or NACK
async fn deliver(
    tx: &mut BufferedUartTx,
    seq: u8,
    message: &Dictionary,
    ack_timeout: Duration,
) -> DeliveryOutcome {
    let mut payload = [0u8; MAX_PAYLOAD_SIZE];
    let len = match message.encode(&mut payload) {
        Ok(len) => len,
        Err(e) => {
            warn!("Failed to encode dictionary: {:?}", e);
            return DeliveryOutcome::Failed(TransportError::Rejected);
        }
    };
    let frame = match Frame::new(FrameKind::Dictionary, seq, &payload[..len]) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Failed to frame dictionary: {:?}", e);
            return DeliveryOutcome::Failed(TransportError::Rejected);
        }
    };

    // Drop any ACK left over from an earlier, timed-out request
    DELIVERY.reset();
    if let Err(e) = write_frame(tx, &frame).await {
        return DeliveryOutcome::Failed(e);
    }

    let deadline = Instant::now() + ack_timeout;
    loop {
        match select3(Timer::at(deadline), DELIVERY.wait(), ANSWER.wait()).await {
            Either3::First(()) => {
                warn!("No ACK for {} within {} ms", seq, ack_timeout.as_millis());
                return DeliveryOutcome::Failed(TransportError::Timeout);
            }
            Either3::Second((acked, outcome)) if acked == seq => return outcome,
            Either3::Second((acked, _)) => {
                debug!("Ignoring ACK for stale sequence {}", acked);
            }
            Either3::Third(answer) => {
                // The companion resends on a missing ACK; our own request keeps waiting
                if let Err(e) = write_frame(tx, &answer).await {
                    warn!("Answer {} not sent: {:?}", answer.seq, e);
                }
            }
        }
    }
}

async fn write_frame(tx: &mut BufferedUartTx, frame: &Frame) -> Result<(), TransportError> {
    let mut buf = [0u8; MAX_FRAME_SIZE];
    let len = frame.encode(&mut buf).map_err(|e| {
        warn!("Failed to encode frame: {:?}", e);
        TransportError::Rejected
    })?;

    tx.write_all(&buf[..len]).await.map_err(|e| {
        warn!("UART write error: {:?}", e);
        TransportError::NotConnected
    })?;

    trace!("TX: {} bytes", len);
    Ok(())
}
