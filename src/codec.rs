//! Characteristic value decoding.
//!
//! Values are little-endian and sized by the characteristic's declared
//! [`Format`]. Numeric values are scaled by `10^exponent`; booleans are not.

use crate::presentation::{Format, PresentationInfo};
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// A decoded characteristic value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
}

impl Value {
    /// The value used when a payload cannot be decoded.
    pub const ZERO: Value = Value::Number(0.0);
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Value payload shorter than its declared format requires.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Length mismatch for {format} value: expected {expected} bytes, got {actual}")]
pub struct LengthMismatch {
    pub format: Format,
    pub expected: usize,
    pub actual: usize,
}

/// Decode a raw value according to its presentation info.
///
/// Unsupported formats decode to [`Value::ZERO`] without a length check.
///
/// # Example
/// ```
/// use gatt_logger::codec::{Value, decode_value};
/// use gatt_logger::presentation::{Format, PresentationInfo};
///
/// let info = PresentationInfo::new(Format::SInt16, -2, 0x272F);
/// assert_eq!(decode_value(&[0x29, 0x09], &info), Ok(Value::Number(23.45)));
/// ```
pub fn decode_value(data: &[u8], info: &PresentationInfo) -> Result<Value, LengthMismatch> {
    let Some(expected) = info.format.byte_len() else {
        return Ok(Value::ZERO);
    };

    if data.len() < expected {
        return Err(LengthMismatch {
            format: info.format,
            expected,
            actual: data.len(),
        });
    }

    let raw = match info.format {
        Format::Boolean => return Ok(Value::Bool(data[0] != 0)),
        Format::UInt8 => f64::from(data[0]),
        Format::SInt8 => f64::from(data[0] as i8),
        Format::UInt16 => f64::from(u16::from_le_bytes([data[0], data[1]])),
        Format::SInt16 => f64::from(i16::from_le_bytes([data[0], data[1]])),
        Format::UInt32 => f64::from(u32::from_le_bytes([data[0], data[1], data[2], data[3]])),
        Format::SInt32 => f64::from(i32::from_le_bytes([data[0], data[1], data[2], data[3]])),
        Format::Float32 => f64::from(f32::from_le_bytes([data[0], data[1], data[2], data[3]])),
        Format::Unsupported(_) => return Ok(Value::ZERO),
    };

    Ok(Value::Number(scale(raw, info.exponent)))
}

/// Decode a raw value, falling back to [`Value::ZERO`] on a length mismatch.
pub fn decode_or_zero(data: &[u8], info: &PresentationInfo) -> Value {
    decode_value(data, info).unwrap_or_else(|e| {
        warn!("{e}");
        Value::ZERO
    })
}

/// Apply a decimal exponent. f64 covers 10^-128..10^127 without overflow.
///
/// Negative exponents divide by an exact power of ten so that e.g. `2345e-2`
/// lands on the closest double to `23.45`.
#[inline]
fn scale(raw: f64, exponent: i8) -> f64 {
    let exponent = i32::from(exponent);
    if exponent < 0 {
        raw / 10f64.powi(-exponent)
    } else {
        raw * 10f64.powi(exponent)
    }
}
