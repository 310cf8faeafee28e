//! Registry of discovered characteristics for the current connection.
//!
//! Registration order is the display order and the CSV column order, so the
//! registry keeps records in a `Vec` and uses a `HashMap` only as an index.

use crate::presentation::PresentationInfo;
use crate::unit::unit_label;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Opaque characteristic identifier assigned by the transport.
///
/// Stable for the life of one connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacteristicId(String);

impl CharacteristicId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CharacteristicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CharacteristicId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CharacteristicId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A characteristic whose name and presentation format are both resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacteristicRecord {
    pub id: CharacteristicId,
    pub name: String,
    pub service_name: String,
    pub presentation: PresentationInfo,
    /// Most recent formatted value, empty until the first reading.
    pub last_value: String,
}

/// One registry entry as seen by the display and the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub id: CharacteristicId,
    pub service_name: String,
    pub name: String,
    pub unit: &'static str,
    pub last_value: String,
}

/// Ordered map from characteristic id to its record.
#[derive(Debug, Default)]
pub struct Registry {
    records: Vec<CharacteristicRecord>,
    index: HashMap<CharacteristicId, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a characteristic with an empty last value.
    ///
    /// Re-registering an existing id replaces its record in place, keeping its
    /// original position.
    pub fn register(
        &mut self,
        id: CharacteristicId,
        name: impl Into<String>,
        service_name: impl Into<String>,
        presentation: PresentationInfo,
    ) {
        let record = CharacteristicRecord {
            id: id.clone(),
            name: name.into(),
            service_name: service_name.into(),
            presentation,
            last_value: String::new(),
        };

        match self.index.get(&id) {
            Some(&position) => {
                debug!("Re-registering characteristic {id}");
                self.records[position] = record;
            }
            None => {
                debug!(
                    "Registered characteristic {id} ({}/{})",
                    record.service_name, record.name
                );
                self.index.insert(id, self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Store the latest formatted value for `id`.
    ///
    /// Returns `false` (and logs) when `id` is not registered.
    pub fn record_value(&mut self, id: &CharacteristicId, value: impl Into<String>) -> bool {
        match self.index.get(id) {
            Some(&position) => {
                self.records[position].last_value = value.into();
                true
            }
            None => {
                warn!("Value for unknown characteristic {id} ignored");
                false
            }
        }
    }

    pub fn get(&self, id: &CharacteristicId) -> Option<&CharacteristicRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    /// Records in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CharacteristicRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// Current state of every characteristic, in registration order.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.records
            .iter()
            .map(|record| SnapshotEntry {
                id: record.id.clone(),
                service_name: record.service_name.clone(),
                name: record.name.clone(),
                unit: unit_label(record.presentation.unit),
                last_value: record.last_value.clone(),
            })
            .collect()
    }
}
