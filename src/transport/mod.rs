//! Events delivered by the BLE transport collaborator.
//!
//! The transport owns connection management and pushes [`GattEvent`]s into a
//! channel; the session drains and applies them on a single task.

pub mod lines;

use crate::registry::CharacteristicId;
use std::io;
use thiserror::Error;

/// Channel buffer size for transport events.
pub const EVENT_CHANNEL_BUFFER_SIZE: usize = 100;

/// A single event from the transport or from the user controls it relays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GattEvent {
    /// A new connection is being established.
    Connected,
    /// The peripheral disconnected.
    Disconnected,
    /// A characteristic was enumerated together with its raw presentation descriptor.
    Discovered {
        id: CharacteristicId,
        service: String,
        name: String,
        descriptor: Vec<u8>,
    },
    /// A characteristic value was read or notified.
    Value { id: CharacteristicId, data: Vec<u8> },
    /// Start periodic logging.
    StartLog,
    /// Stop logging and export.
    StopLog,
}

/// Error type for transport operations.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Transport I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}
