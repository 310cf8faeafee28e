//! Output side of a session: live value display and log export.
//!
//! The session reports through the [`Sink`] trait so the run loop can be
//! tested deterministically with in-memory writers.

pub mod csv;
pub mod writer;

use crate::registry::CharacteristicId;
use std::io;

/// Receiver for decoded values and exported logs.
pub trait Sink {
    /// A characteristic produced a new formatted value.
    ///
    /// # Arguments
    /// * `id` - The characteristic that changed
    /// * `value` - The formatted value, without unit
    /// * `unit` - The unit label, possibly empty
    fn value_updated(&mut self, id: &CharacteristicId, value: &str, unit: &str) -> io::Result<()>;

    /// Logging stopped and produced CSV text.
    fn log_exported(&mut self, csv: &str) -> io::Result<()>;
}
