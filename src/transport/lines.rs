//! Line-oriented text transport.
//!
//! Lets any external BLE tool drive a session by writing one event per line:
//!
//! ```text
//! connect
//! char <id> <service> <name> <descriptor-hex>
//! value <id> <hex>
//! log start
//! log stop
//! disconnect
//! ```
//!
//! `<service>` and `<name>` are either `0x`-prefixed 16-bit UUIDs, resolved
//! through [`crate::catalog`], or literal names with `_` for spaces. Blank lines
//! and lines starting with `#` are skipped.

use crate::catalog::{characteristic_name, resolve_name, service_name};
use crate::hex::{ParseHexError, parse_hex};
use crate::registry::CharacteristicId;
use crate::transport::{EVENT_CHANNEL_BUFFER_SIZE, GattEvent, TransportError};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Errors returned when parsing an event line.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
    #[error(transparent)]
    Hex(#[from] ParseHexError),
}

/// Parse one line into an event. Blank and comment lines yield `Ok(None)`.
///
/// # Example
/// ```
/// use gatt_logger::transport::GattEvent;
/// use gatt_logger::transport::lines::parse_line;
///
/// let event = parse_line("value batt 50").unwrap();
/// assert_eq!(
///     event,
///     Some(GattEvent::Value { id: "batt".into(), data: vec![0x50] })
/// );
/// ```
pub fn parse_line(line: &str) -> Result<Option<GattEvent>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let command = fields.next().ok_or(ParseError::MissingField("command"))?;

    let event = match command {
        "connect" => GattEvent::Connected,
        "disconnect" => GattEvent::Disconnected,
        "char" => {
            let id = next_field(&mut fields, "characteristic id")?;
            let service = next_field(&mut fields, "service")?;
            let name = next_field(&mut fields, "characteristic name")?;
            let descriptor = next_field(&mut fields, "descriptor")?;
            GattEvent::Discovered {
                id: CharacteristicId::new(id),
                service: resolve_name(service, service_name),
                name: resolve_name(name, characteristic_name),
                descriptor: parse_hex(descriptor)?,
            }
        }
        "value" => {
            let id = next_field(&mut fields, "characteristic id")?;
            let data = next_field(&mut fields, "value")?;
            GattEvent::Value {
                id: CharacteristicId::new(id),
                data: parse_hex(data)?,
            }
        }
        "log" => match next_field(&mut fields, "log action")? {
            "start" => GattEvent::StartLog,
            "stop" => GattEvent::StopLog,
            other => return Err(ParseError::UnknownCommand(format!("log {other}"))),
        },
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    match fields.next() {
        Some(extra) => Err(ParseError::TrailingInput(extra.to_string())),
        None => Ok(Some(event)),
    }
}

fn next_field<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<&'a str, ParseError> {
    fields.next().ok_or(ParseError::MissingField(what))
}

/// Read lines from `reader` and forward parsed events to `tx` until EOF or
/// until the receiver is dropped. Unparsable lines, including lines that are
/// not valid UTF-8, are logged and skipped.
pub async fn forward_lines<R>(mut reader: R, tx: mpsc::Sender<GattEvent>) -> Result<(), TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_number += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!("Line {line_number}: {e}");
                continue;
            }
        };

        match parse_line(line) {
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    debug!("Event receiver dropped, stopping input");
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Line {line_number}: {e}"),
        }
    }

    Ok(())
}

/// Transport reading events from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinTransport;

impl crate::app::Transport for StdinTransport {
    fn open(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<mpsc::Receiver<GattEvent>, TransportError>> + Send + '_>>
    {
        Box::pin(async move {
            let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER_SIZE);
            tokio::spawn(async move {
                let reader = BufReader::new(tokio::io::stdin());
                if let Err(e) = forward_lines(reader, tx).await {
                    warn!("{e}");
                }
            });
            Ok(rx)
        })
    }
}
