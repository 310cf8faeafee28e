//! Characteristic Presentation Format descriptor (UUID 0x2904).
//!
//! The descriptor is a 7-byte little-endian record attached to a characteristic:
//!
//! | offset | size | field                  |
//! |--------|------|------------------------|
//! | 0      | 1    | format code            |
//! | 1      | 1    | exponent (signed)      |
//! | 2      | 2    | unit (GATT unit UUID)  |
//! | 4      | 1    | namespace              |
//! | 5      | 2    | description            |
//!
//! Only format, exponent and unit are used; namespace and description are ignored.

use std::fmt;
use thiserror::Error;

/// Length of a Characteristic Presentation Format descriptor in bytes.
pub const PRESENTATION_DESCRIPTOR_LEN: usize = 7;

/// Bluetooth SIG namespace, written by [`PresentationInfo::to_bytes`].
const BLUETOOTH_SIG_NAMESPACE: u8 = 0x01;

/// Error returned when a presentation descriptor cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Descriptor shorter than the fixed 7-byte layout.
    #[error("Malformed presentation descriptor: expected 7 bytes, got {len}")]
    Malformed { len: usize },
}

/// GATT value format, as declared by the presentation descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Boolean,
    UInt8,
    UInt16,
    UInt32,
    SInt8,
    SInt16,
    SInt32,
    Float32,
    /// Any format code this crate does not decode. Values decode to zero.
    Unsupported(u8),
}

impl Format {
    /// Map a GATT format code to a [`Format`].
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => Format::Boolean,
            0x04 => Format::UInt8,
            0x06 => Format::UInt16,
            0x08 => Format::UInt32,
            0x0C => Format::SInt8,
            0x0E => Format::SInt16,
            0x10 => Format::SInt32,
            0x14 => Format::Float32,
            other => Format::Unsupported(other),
        }
    }

    /// The GATT format code for this format.
    pub fn code(self) -> u8 {
        match self {
            Format::Boolean => 0x01,
            Format::UInt8 => 0x04,
            Format::UInt16 => 0x06,
            Format::UInt32 => 0x08,
            Format::SInt8 => 0x0C,
            Format::SInt16 => 0x0E,
            Format::SInt32 => 0x10,
            Format::Float32 => 0x14,
            Format::Unsupported(code) => code,
        }
    }

    /// Number of value bytes the format occupies, or `None` for unsupported formats.
    pub fn byte_len(self) -> Option<usize> {
        match self {
            Format::Boolean | Format::UInt8 | Format::SInt8 => Some(1),
            Format::UInt16 | Format::SInt16 => Some(2),
            Format::UInt32 | Format::SInt32 | Format::Float32 => Some(4),
            Format::Unsupported(_) => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Boolean => write!(f, "boolean"),
            Format::UInt8 => write!(f, "uint8"),
            Format::UInt16 => write!(f, "uint16"),
            Format::UInt32 => write!(f, "uint32"),
            Format::SInt8 => write!(f, "sint8"),
            Format::SInt16 => write!(f, "sint16"),
            Format::SInt32 => write!(f, "sint32"),
            Format::Float32 => write!(f, "float32"),
            Format::Unsupported(code) => write!(f, "unsupported(0x{code:02X})"),
        }
    }
}

/// Decoded presentation descriptor for one characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationInfo {
    pub format: Format,
    /// Decimal exponent applied to the raw value: `value = raw * 10^exponent`.
    pub exponent: i8,
    /// GATT unit UUID (e.g. 0x272F for degrees Celsius).
    pub unit: u16,
}

impl PresentationInfo {
    pub fn new(format: Format, exponent: i8, unit: u16) -> Self {
        Self {
            format,
            exponent,
            unit,
        }
    }

    /// Encode as a 7-byte descriptor with the Bluetooth SIG namespace and
    /// description 0.
    pub fn to_bytes(&self) -> [u8; PRESENTATION_DESCRIPTOR_LEN] {
        let unit = self.unit.to_le_bytes();
        [
            self.format.code(),
            self.exponent as u8,
            unit[0],
            unit[1],
            BLUETOOTH_SIG_NAMESPACE,
            0x00,
            0x00,
        ]
    }
}

/// Parse a Characteristic Presentation Format descriptor.
///
/// Bytes beyond the first seven are ignored.
///
/// # Example
/// ```
/// use gatt_logger::presentation::{Format, parse_presentation};
///
/// let info = parse_presentation(&[0x0E, 0xFE, 0x2F, 0x27, 0x01, 0x00, 0x00]).unwrap();
/// assert_eq!(info.format, Format::SInt16);
/// assert_eq!(info.exponent, -2);
/// assert_eq!(info.unit, 0x272F);
/// ```
pub fn parse_presentation(data: &[u8]) -> Result<PresentationInfo, DescriptorError> {
    if data.len() < PRESENTATION_DESCRIPTOR_LEN {
        return Err(DescriptorError::Malformed { len: data.len() });
    }

    Ok(PresentationInfo {
        format: Format::from_code(data[0]),
        exponent: data[1] as i8,
        unit: u16::from_le_bytes([data[2], data[3]]),
    })
}
