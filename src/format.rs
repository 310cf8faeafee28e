//! Display formatting for decoded characteristic values.

use crate::codec::Value;
use crate::presentation::{Format, PresentationInfo};

/// Upper bound on the number of decimal places rendered.
pub const MAX_DECIMALS: usize = 100;

/// Number of decimal places implied by a decimal exponent.
///
/// `-2` → 2, `0` → 0, any positive exponent → 0, capped at [`MAX_DECIMALS`].
#[inline]
pub fn decimals_for(exponent: i8) -> usize {
    (-i32::from(exponent)).clamp(0, MAX_DECIMALS as i32) as usize
}

/// Render a decoded value using the precision declared by its presentation info.
///
/// Booleans pass through as `true`/`false`. Numbers are rendered fixed-point
/// with [`decimals_for`] digits; rounding is to nearest on the exact binary
/// value, ties to even.
///
/// # Example
/// ```
/// use gatt_logger::codec::Value;
/// use gatt_logger::format::format_value;
/// use gatt_logger::presentation::{Format, PresentationInfo};
///
/// let info = PresentationInfo::new(Format::SInt16, -2, 0x272F);
/// assert_eq!(format_value(Value::Number(12.34), &info), "12.34");
/// ```
pub fn format_value(value: Value, info: &PresentationInfo) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if info.format == Format::Boolean => n.to_string(),
        // `+ 0.0` turns -0.0 into 0.0 so a negative zero payload renders as "0".
        Value::Number(n) => format!("{:.*}", decimals_for(info.exponent), n + 0.0),
    }
}

/// Join a formatted value with its unit label for live display.
pub fn display_string(value: &str, unit: &str) -> String {
    if unit.is_empty() {
        value.to_string()
    } else {
        format!("{value} {unit}")
    }
}
