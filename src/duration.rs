//! Human-readable duration parsing for the log period option.

use std::time::Duration;

/// Parse a duration from a human-readable string.
///
/// Supports the following suffixes:
/// - `s` or no suffix: seconds
/// - `m`: minutes
/// - `h`: hours
/// - `ms`: milliseconds
///
/// # Examples
/// ```
/// use gatt_logger::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
/// assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// ```
pub fn parse_duration(src: &str) -> Result<Duration, String> {
    let src = src.trim();

    if src.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (num, unit_millis) = if let Some(num) = src.strip_suffix("ms") {
        (num, 1)
    } else if let Some(num) = src.strip_suffix('h') {
        (num, 3_600_000)
    } else if let Some(num) = src.strip_suffix('m') {
        (num, 60_000)
    } else if let Some(num) = src.strip_suffix('s') {
        (num, 1_000)
    } else {
        (src, 1_000)
    };

    let value: u64 = num
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration: {}", src))?;
    value
        .checked_mul(unit_millis)
        .map(Duration::from_millis)
        .ok_or_else(|| format!("duration too large: {}", src))
}

/// Parse a log period; like [`parse_duration`] but rejects zero.
pub fn parse_period(src: &str) -> Result<Duration, String> {
    let period = parse_duration(src)?;
    if period.is_zero() {
        return Err("log period must be greater than zero".to_string());
    }
    Ok(period)
}
