//! Encoded polyline codec as used by the Google Maps APIs.
//!
//! Each coordinate is stored as the delta to its predecessor, scaled by 1e5,
//! zig-zag encoded and split into 5-bit chunks. A chunk is written as the
//! character `chunk + 63`, with `0x20` set on every chunk except the last of a
//! value.

use std::{error, fmt};

pub const PRECISION: f64 = 100_000.0;

const CHAR_OFFSET: u8 = 63;
const CONTINUATION_BIT: i64 = 0x20;
const CHUNK_MASK: i64 = 0x1f;
const MAX_SHIFT: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    /// A byte outside of `'?'..='~'`.
    InvalidCharacter { position: usize, byte: u8 },
    /// The input ended in the middle of a value or after a lone latitude.
    Truncated { position: usize },
    /// More continuation chunks than fit into the accumulator.
    Overflow { position: usize },
}

impl error::Error for PolylineError {}

impl fmt::Display for PolylineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolylineError::InvalidCharacter { position, byte } => write!(
                f,
                "invalid polyline character {:?} at position {}",
                *byte as char, position
            ),
            PolylineError::Truncated { position } => {
                write!(f, "polyline ended unexpectedly at position {}", position)
            }
            PolylineError::Overflow { position } => {
                write!(f, "polyline value too long at position {}", position)
            }
        }
    }
}

/// Reads one zig-zag encoded value starting at `*cursor` and advances the
/// cursor past it.
fn decode_value(bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let start = *cursor;
    let mut result: i64 = 0;
    let mut shift: u32 = 0;
    loop {
        let byte = *bytes
            .get(*cursor)
            .ok_or(PolylineError::Truncated { position: *cursor })?;
        if !(CHAR_OFFSET..=CHAR_OFFSET + 63).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                position: *cursor,
                byte,
            });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { position: start });
        }
        let chunk = (byte - CHAR_OFFSET) as i64;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        *cursor += 1;
        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }
    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Adds the next delta to a running coordinate. Deltas can be close to
/// `i64::MAX`, so the sum has to be checked.
fn accumulate(total: i64, bytes: &[u8], cursor: &mut usize) -> Result<i64, PolylineError> {
    let position = *cursor;
    let delta = decode_value(bytes, cursor)?;
    total
        .checked_add(delta)
        .ok_or(PolylineError::Overflow { position })
}

/// Decodes an encoded polyline into `(latitude, longitude)` pairs in the
/// order they were encoded.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64)>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut cursor = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while cursor < bytes.len() {
        lat = accumulate(lat, bytes, &mut cursor)?;
        lng = accumulate(lng, bytes, &mut cursor)?;
        points.push((lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(points)
}

fn encode_value(value: i64, output: &mut String) {
    let mut value = if value < 0 { !(value << 1) } else { value << 1 };
    while value >= CONTINUATION_BIT {
        output.push(((CONTINUATION_BIT | (value & CHUNK_MASK)) as u8 + CHAR_OFFSET) as char);
        value >>= 5;
    }
    output.push((value as u8 + CHAR_OFFSET) as char);
}

/// Encodes `(latitude, longitude)` pairs, rounding each to 1e-5 degrees.
pub fn encode<I>(points: I) -> String
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut output = String::new();
    let mut previous_lat: i64 = 0;
    let mut previous_lng: i64 = 0;

    for (latitude, longitude) in points {
        let lat = (latitude * PRECISION).round() as i64;
        let lng = (longitude * PRECISION).round() as i64;
        encode_value(lat - previous_lat, &mut output);
        encode_value(lng - previous_lng, &mut output);
        previous_lat = lat;
        previous_lng = lng;
    }

    output
}
