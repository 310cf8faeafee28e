//! Hex payload parsing for the text transport.

use thiserror::Error;

/// Errors returned when parsing a hex payload.
#[derive(Error, Debug, PartialEq)]
pub enum ParseHexError {
    #[error("invalid hex payload: odd number of digits in '{0}'")]
    OddLength(String),
    #[error("invalid hex payload: '{0}' is not valid hex")]
    InvalidHex(String),
}

/// Parse a hex byte string.
///
/// Accepts contiguous digits (`2909`) or bytes separated by `:` or `-`
/// (`29:09`). A single `-` is an empty payload.
///
/// # Example
/// ```
/// use gatt_logger::hex::parse_hex;
///
/// assert_eq!(parse_hex("29:09").unwrap(), vec![0x29, 0x09]);
/// assert_eq!(parse_hex("0efe").unwrap(), vec![0x0E, 0xFE]);
/// ```
pub fn parse_hex(src: &str) -> Result<Vec<u8>, ParseHexError> {
    if src == "-" {
        return Ok(Vec::new());
    }

    let digits: String = src.chars().filter(|c| *c != ':' && *c != '-').collect();
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseHexError::InvalidHex(src.to_string()));
    }
    if digits.len() % 2 != 0 {
        return Err(ParseHexError::OddLength(src.to_string()));
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ParseHexError::InvalidHex(src.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contiguous() {
        assert_eq!(
            parse_hex("0efe2f27010000").unwrap(),
            vec![0x0E, 0xFE, 0x2F, 0x27, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn test_parse_separated() {
        assert_eq!(parse_hex("AA:bb-CC").unwrap(), vec![0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_hex("-").unwrap(), Vec::<u8>::new());
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_parse_odd_length() {
        assert_eq!(
            parse_hex("123"),
            Err(ParseHexError::OddLength("123".to_string()))
        );
    }

    #[test]
    fn test_parse_invalid_digit() {
        assert_eq!(
            parse_hex("12zz"),
            Err(ParseHexError::InvalidHex("12zz".to_string()))
        );
        assert!(parse_hex("+1").is_err());
        assert!(parse_hex("éé").is_err());
    }
}
