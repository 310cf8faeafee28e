//! `gatt-logger` library.
//!
//! The binary (`src/main.rs`) is responsible for CLI parsing and process exit codes.
//! Decoding lives in [`crate::presentation`], [`crate::codec`] and [`crate::format`];
//! the run loop in [`crate::app`] can be tested deterministically with an
//! injected transport, clock and output.

pub mod app;
pub mod catalog;
pub mod codec;
pub mod datalog;
pub mod duration;
pub mod format;
pub mod hex;
pub mod output;
pub mod presentation;
pub mod registry;
pub mod session;
pub mod transport;
pub mod unit;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types at the crate root
pub use codec::{LengthMismatch, Value, decode_or_zero, decode_value};
pub use datalog::{Clock, DataLog, LocalClock, LogError, LogState, Timestamp};
pub use format::{display_string, format_value};
pub use output::Sink;
pub use presentation::{DescriptorError, Format, PresentationInfo, parse_presentation};
pub use registry::{CharacteristicId, CharacteristicRecord, Registry, SnapshotEntry};
pub use session::Session;
pub use transport::{GattEvent, TransportError};
pub use unit::unit_label;
