//! Frame encoding and decoding for the companion link.
//!
//! Frame format:
//! - START (1 byte): 0x5A synchronization byte
//! - LENGTH (1 byte): payload length (0-240)
//! - KIND (1 byte): frame kind (dictionary, ack, nack)
//! - SEQ (1 byte): sequence number, echoed by ACK/NACK
//! - PAYLOAD (0-240 bytes): kind-specific data
//! - CRC (1 byte): CRC-8 (poly 0x07) over LENGTH, KIND, SEQ and PAYLOAD

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x5A;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 240;

/// Bytes around the payload (START + LENGTH + KIND + SEQ + CRC)
pub const FRAME_OVERHEAD: usize = 5;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// CRC mismatch
    InvalidChecksum,
    /// Unknown frame kind or malformed header
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Frame kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FrameKind {
    /// Payload is an encoded dictionary
    Dictionary = 0x01,
    /// Dictionary with the same SEQ was accepted
    Ack = 0x02,
    /// Dictionary with the same SEQ was refused; payload is one result code
    Nack = 0x03,
}

impl FrameKind {
    /// Parse a kind from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(FrameKind::Dictionary),
            0x02 => Some(FrameKind::Ack),
            0x03 => Some(FrameKind::Nack),
            _ => None,
        }
    }
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame kind
    pub kind: FrameKind,
    /// Sequence number
    pub seq: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given kind, sequence number and payload
    pub fn new(kind: FrameKind, seq: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            kind,
            seq,
            payload: payload_vec,
        })
    }

    /// Acknowledge the frame with sequence number `seq`
    pub fn ack(seq: u8) -> Self {
        Self {
            kind: FrameKind::Ack,
            seq,
            payload: Vec::new(),
        }
    }

    /// Refuse the frame with sequence number `seq`
    pub fn nack(seq: u8, result_code: u8) -> Self {
        let mut payload = Vec::new();
        // Capacity is far above one byte
        let _ = payload.push(result_code);
        Self {
            kind: FrameKind::Nack,
            seq,
            payload,
        }
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = FRAME_OVERHEAD + self.payload.len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = FRAME_START;
        buffer[1] = self.payload.len() as u8;
        buffer[2] = self.kind as u8;
        buffer[3] = self.seq;
        buffer[4..4 + self.payload.len()].copy_from_slice(&self.payload);
        buffer[frame_len - 1] = crc8(&buffer[1..frame_len - 1]);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// CRC-8 with polynomial 0x07, initial value 0
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        crc = crc8_update(crc, byte);
    }
    crc
}

fn crc8_update(crc: u8, byte: u8) -> u8 {
    let mut crc = crc ^ byte;
    for _ in 0..8 {
        crc = if crc & 0x80 != 0 {
            (crc << 1) ^ 0x07
        } else {
            crc << 1
        };
    }
    crc
}

/// Streaming parser for incoming frames
///
/// Bytes arrive in arbitrary chunks from the UART; the parser keeps its
/// position between calls and resynchronizes on the next START byte after
/// any error.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_length: u8,
    kind: FrameKind,
    seq: u8,
    crc: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Hunting for START
    Sync,
    /// Got START
    Length,
    /// Got LENGTH
    Kind,
    /// Got KIND
    Seq,
    /// Reading payload bytes
    Payload,
    /// All data in, CRC next
    Crc,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::Sync,
            buffer: Vec::new(),
            expected_length: 0,
            kind: FrameKind::Dictionary,
            seq: 0,
            crc: 0,
        }
    }

    /// Drop any partial frame and wait for the next START byte
    pub fn reset(&mut self) {
        self.state = ParseState::Sync;
        self.buffer.clear();
        self.expected_length = 0;
        self.seq = 0;
        self.crc = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::Sync => {
                if byte == FRAME_START {
                    self.crc = 0;
                    self.state = ParseState::Length;
                }
                Ok(None)
            }
            ParseState::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::PayloadTooLarge);
                }
                self.expected_length = byte;
                self.crc = crc8_update(self.crc, byte);
                self.state = ParseState::Kind;
                Ok(None)
            }
            ParseState::Kind => {
                let Some(kind) = FrameKind::from_byte(byte) else {
                    self.reset();
                    return Err(FrameError::InvalidFrame);
                };
                self.kind = kind;
                self.crc = crc8_update(self.crc, byte);
                self.state = ParseState::Seq;
                Ok(None)
            }
            ParseState::Seq => {
                self.seq = byte;
                self.crc = crc8_update(self.crc, byte);
                self.buffer.clear();
                self.state = if self.expected_length == 0 {
                    ParseState::Crc
                } else {
                    ParseState::Payload
                };
                Ok(None)
            }
            ParseState::Payload => {
                // Length was bounded when the header was accepted
                let _ = self.buffer.push(byte);
                self.crc = crc8_update(self.crc, byte);
                if self.buffer.len() == self.expected_length as usize {
                    self.state = ParseState::Crc;
                }
                Ok(None)
            }
            ParseState::Crc => {
                if byte != self.crc {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }

                let frame = Frame {
                    kind: self.kind,
                    seq: self.seq,
                    payload: self.buffer.clone(),
                };

                self.reset();
                Ok(Some(frame))
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found together with the number of
    /// bytes consumed; the caller feeds the remainder on the next call.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Result<Option<Frame>, FrameError>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                other => return (other, i + 1),
            }
        }
        (Ok(None), bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        let mut parser = FrameParser::new();
        parser.feed_bytes(bytes).0
    }

    #[test]
    fn test_crc8_check_value() {
        // Standard check value for CRC-8 (poly 0x07, init 0)
        assert_eq!(crc8(b"123456789"), 0xF4);
        assert_eq!(crc8(&[]), 0);
    }

    #[test]
    fn test_ack_encoding() {
        let frame = Frame::ack(7);
        let mut buffer = [0u8; 8];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 5);
        assert_eq!(buffer[0], FRAME_START);
        assert_eq!(buffer[1], 0); // length
        assert_eq!(buffer[2], FrameKind::Ack as u8);
        assert_eq!(buffer[3], 7); // seq
        assert_eq!(buffer[4], crc8(&[0, 0x02, 7]));
    }

    #[test]
    fn test_dictionary_frame_roundtrip() {
        let original = Frame::new(FrameKind::Dictionary, 42, &[1, 2, 3, 4, 5]).unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let parsed = parse_all(&encoded).unwrap().unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_nack_carries_result_code() {
        let encoded = Frame::nack(3, 64).encode_to_vec().unwrap();
        let parsed = parse_all(&encoded).unwrap().unwrap();

        assert_eq!(parsed.kind, FrameKind::Nack);
        assert_eq!(parsed.seq, 3);
        assert_eq!(&parsed.payload[..], &[64]);
    }

    #[test]
    fn test_parser_invalid_checksum() {
        let mut encoded = Frame::ack(1).encode_to_vec().unwrap();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;

        assert_eq!(parse_all(&encoded), Err(FrameError::InvalidChecksum));
    }

    #[test]
    fn test_parser_rejects_unknown_kind() {
        assert_eq!(
            parse_all(&[FRAME_START, 0, 0x7F, 0, 0]),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_parser_rejects_oversized_length() {
        assert_eq!(
            parse_all(&[FRAME_START, (MAX_PAYLOAD_SIZE + 1) as u8]),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_parser_resync_after_garbage() {
        let encoded = Frame::ack(9).encode_to_vec().unwrap();

        let mut data = Vec::<u8, 20>::new();
        data.extend_from_slice(&[0x00, 0xFF, 0x12, 0x34]).unwrap();
        data.extend_from_slice(&encoded).unwrap();

        let parsed = parse_all(&data).unwrap().unwrap();
        assert_eq!(parsed.kind, FrameKind::Ack);
        assert_eq!(parsed.seq, 9);
    }

    #[test]
    fn test_feed_bytes_reports_consumed() {
        let first = Frame::ack(1).encode_to_vec().unwrap();
        let second = Frame::ack(2).encode_to_vec().unwrap();

        let mut data = Vec::<u8, 20>::new();
        data.extend_from_slice(&first).unwrap();
        data.extend_from_slice(&second).unwrap();

        let mut parser = FrameParser::new();
        let (result, used) = parser.feed_bytes(&data);
        assert_eq!(result.unwrap().unwrap().seq, 1);
        assert_eq!(used, first.len());

        let (result, used) = parser.feed_bytes(&data[used..]);
        assert_eq!(result.unwrap().unwrap().seq, 2);
        assert_eq!(used, second.len());
    }

    #[test]
    fn test_frame_split_across_reads() {
        let encoded = Frame::new(FrameKind::Dictionary, 5, b"split")
            .unwrap()
            .encode_to_vec()
            .unwrap();
        let (head, tail) = encoded.split_at(4);

        let mut parser = FrameParser::new();
        assert_eq!(parser.feed_bytes(head).0, Ok(None));
        let frame = parser.feed_bytes(tail).0.unwrap().unwrap();
        assert_eq!(&frame.payload[..], b"split");
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        let result = Frame::new(FrameKind::Dictionary, 0, &large_payload);
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }
}
