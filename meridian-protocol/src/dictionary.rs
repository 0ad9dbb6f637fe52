//! Keyed tuple dictionaries
//!
//! Every application message is a small dictionary of `(key, value)`
//! tuples. Encoding (all integers little-endian):
//!
//! ```text
//! count:u8 { key:u32 type:u8 length:u16 value[length] } * count
//! ```
//!
//! Types: 0 byte array, 1 NUL-terminated string, 2 unsigned int,
//! 3 signed int. Integers are 1, 2 or 4 bytes wide.

use heapless::{String, Vec};

/// Maximum number of tuples in one dictionary
pub const MAX_TUPLES: usize = 8;

/// Maximum size of a byte or string value
pub const MAX_VALUE_SIZE: usize = 64;

/// Encoded tuple header (key + type + length)
const TUPLE_HEADER_SIZE: usize = 7;

const TYPE_BYTES: u8 = 0;
const TYPE_CSTRING: u8 = 1;
const TYPE_UINT: u8 = 2;
const TYPE_INT: u8 = 3;

/// Errors from dictionary encoding and decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DictionaryError {
    /// Input ended before the declared content
    Truncated,
    /// Unknown tuple type byte
    InvalidType,
    /// Integer width other than 1, 2 or 4
    InvalidLength,
    /// String value is not UTF-8
    InvalidUtf8,
    /// More tuples than a dictionary can hold
    TooManyTuples,
    /// Byte or string value exceeds [`MAX_VALUE_SIZE`]
    ValueTooLarge,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

/// A tuple value
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TupleValue {
    Bytes(Vec<u8, MAX_VALUE_SIZE>),
    Text(String<MAX_VALUE_SIZE>),
    Uint(u32),
    Int(i32),
}

impl TupleValue {
    fn type_byte(&self) -> u8 {
        match self {
            TupleValue::Bytes(_) => TYPE_BYTES,
            TupleValue::Text(_) => TYPE_CSTRING,
            TupleValue::Uint(_) => TYPE_UINT,
            TupleValue::Int(_) => TYPE_INT,
        }
    }

    fn encoded_len(&self) -> usize {
        match self {
            TupleValue::Bytes(bytes) => bytes.len(),
            // Trailing NUL
            TupleValue::Text(text) => text.len() + 1,
            TupleValue::Uint(_) | TupleValue::Int(_) => 4,
        }
    }
}

/// One keyed entry of a dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tuple {
    pub key: u32,
    pub value: TupleValue,
}

/// An ordered set of keyed tuples
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dictionary {
    tuples: Vec<Tuple, MAX_TUPLES>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub const fn new() -> Self {
        Self { tuples: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tuple> {
        self.tuples.iter()
    }

    /// Append a tuple
    pub fn push(&mut self, key: u32, value: TupleValue) -> Result<(), DictionaryError> {
        self.tuples
            .push(Tuple { key, value })
            .map_err(|_| DictionaryError::TooManyTuples)
    }

    pub fn push_int(&mut self, key: u32, value: i32) -> Result<(), DictionaryError> {
        self.push(key, TupleValue::Int(value))
    }

    pub fn push_uint(&mut self, key: u32, value: u32) -> Result<(), DictionaryError> {
        self.push(key, TupleValue::Uint(value))
    }

    pub fn push_text(&mut self, key: u32, text: &str) -> Result<(), DictionaryError> {
        let mut value = String::new();
        value
            .push_str(text)
            .map_err(|_| DictionaryError::ValueTooLarge)?;
        self.push(key, TupleValue::Text(value))
    }

    /// First tuple with `key`
    pub fn get(&self, key: u32) -> Option<&TupleValue> {
        self.tuples.iter().find(|t| t.key == key).map(|t| &t.value)
    }

    /// Integer value under `key`
    ///
    /// Companions are loose about signedness, so unsigned values that fit
    /// in an `i32` are accepted too.
    pub fn find_int(&self, key: u32) -> Option<i32> {
        match self.get(key)? {
            TupleValue::Int(v) => Some(*v),
            TupleValue::Uint(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// String value under `key`
    pub fn find_text(&self, key: u32) -> Option<&str> {
        match self.get(key)? {
            TupleValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Size of the encoded form in bytes
    pub fn encoded_len(&self) -> usize {
        1 + self
            .tuples
            .iter()
            .map(|t| TUPLE_HEADER_SIZE + t.value.encoded_len())
            .sum::<usize>()
    }

    /// Encode into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, DictionaryError> {
        if buffer.len() < self.encoded_len() {
            return Err(DictionaryError::BufferTooSmall);
        }

        buffer[0] = self.tuples.len() as u8;
        let mut pos = 1;

        for tuple in &self.tuples {
            let len = tuple.value.encoded_len();
            buffer[pos..pos + 4].copy_from_slice(&tuple.key.to_le_bytes());
            buffer[pos + 4] = tuple.value.type_byte();
            buffer[pos + 5..pos + 7].copy_from_slice(&(len as u16).to_le_bytes());
            pos += TUPLE_HEADER_SIZE;

            let out = &mut buffer[pos..pos + len];
            match &tuple.value {
                TupleValue::Bytes(bytes) => out.copy_from_slice(bytes),
                TupleValue::Text(text) => {
                    out[..text.len()].copy_from_slice(text.as_bytes());
                    out[text.len()] = 0;
                }
                TupleValue::Uint(v) => out.copy_from_slice(&v.to_le_bytes()),
                TupleValue::Int(v) => out.copy_from_slice(&v.to_le_bytes()),
            }
            pos += len;
        }

        Ok(pos)
    }

    /// Decode a dictionary from `data`
    ///
    /// Trailing bytes after the last declared tuple are ignored. Text
    /// longer than [`MAX_VALUE_SIZE`] is cut to fit.
    pub fn decode(data: &[u8]) -> Result<Self, DictionaryError> {
        let (&count, mut rest) = data.split_first().ok_or(DictionaryError::Truncated)?;
        if count as usize > MAX_TUPLES {
            return Err(DictionaryError::TooManyTuples);
        }

        let mut dict = Dictionary::new();
        for _ in 0..count {
            if rest.len() < TUPLE_HEADER_SIZE {
                return Err(DictionaryError::Truncated);
            }
            let key = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
            let kind = rest[4];
            let len = u16::from_le_bytes([rest[5], rest[6]]) as usize;
            rest = &rest[TUPLE_HEADER_SIZE..];

            if rest.len() < len {
                return Err(DictionaryError::Truncated);
            }
            let (raw, tail) = rest.split_at(len);
            rest = tail;

            dict.push(key, decode_value(kind, raw)?)?;
        }

        Ok(dict)
    }
}

fn decode_value(kind: u8, raw: &[u8]) -> Result<TupleValue, DictionaryError> {
    match kind {
        TYPE_BYTES => {
            let mut bytes = Vec::new();
            bytes
                .extend_from_slice(raw)
                .map_err(|_| DictionaryError::ValueTooLarge)?;
            Ok(TupleValue::Bytes(bytes))
        }
        TYPE_CSTRING => {
            // Content ends at the first NUL; a missing terminator is tolerated
            let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
            let text = core::str::from_utf8(&raw[..end])
                .map_err(|_| DictionaryError::InvalidUtf8)?;
            // Text is display-only: keep what fits on a char boundary
            let mut value = String::new();
            for c in text.chars() {
                if value.push(c).is_err() {
                    break;
                }
            }
            Ok(TupleValue::Text(value))
        }
        TYPE_UINT => {
            let v = match *raw {
                [a] => a as u32,
                [a, b] => u16::from_le_bytes([a, b]) as u32,
                [a, b, c, d] => u32::from_le_bytes([a, b, c, d]),
                _ => return Err(DictionaryError::InvalidLength),
            };
            Ok(TupleValue::Uint(v))
        }
        TYPE_INT => {
            let v = match *raw {
                [a] => a as i8 as i32,
                [a, b] => i16::from_le_bytes([a, b]) as i32,
                [a, b, c, d] => i32::from_le_bytes([a, b, c, d]),
                _ => return Err(DictionaryError::InvalidLength),
            };
            Ok(TupleValue::Int(v))
        }
        _ => Err(DictionaryError::InvalidType),
    }
}
