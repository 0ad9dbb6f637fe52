//! Companion UART receive task
//!
//! Parses frames from the companion. Dictionaries become watch events and
//! are answered through the TX task; ACK/NACK frames settle the request
//! the TX task is waiting on.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use meridian_protocol::{
    DeliveryOutcome, Dictionary, Frame, FrameKind, FrameParser, LocationReply, TransportError,
};

use crate::channels::{WatchEvent, ANSWER, DELIVERY, WATCH_EVENTS};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => handle_frame(frame),
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

fn handle_frame(frame: Frame) {
    match frame.kind {
        FrameKind::Dictionary => match Dictionary::decode(&frame.payload) {
            Ok(dict) => {
                ANSWER.signal(Frame::ack(frame.seq));
                let reply = LocationReply::from_dictionary(&dict);
                debug!("Reply: {:?}", reply);
                if WATCH_EVENTS.try_send(WatchEvent::Reply(reply)).is_err() {
                    warn!("Event channel full, dropping reply");
                }
            }
            Err(e) => {
                warn!("Undecodable dictionary: {:?}", e);
                ANSWER.signal(Frame::nack(
                    frame.seq,
                    TransportError::Rejected.to_result_code(),
                ));
            }
        },
        FrameKind::Ack => {
            trace!("ACK {}", frame.seq);
            DELIVERY.signal((frame.seq, DeliveryOutcome::Sent));
        }
        FrameKind::Nack => {
            let outcome = DeliveryOutcome::from_nack(&frame.payload);
            debug!("NACK {}: {:?}", frame.seq, outcome);
            DELIVERY.signal((frame.seq, outcome));
        }
    }
}
