//! Periodic value log.
//!
//! [`DataLog`] is a two-state machine (idle / logging). While logging, each
//! [`DataLog::tick`] captures the registry's last values into a row keyed by a
//! second-resolution local [`Timestamp`]. Two ticks inside the same second share
//! a key, so the later one replaces the earlier row in place.
//!
//! The log is not bounded; it holds every row since the last start.
//! The periodic timer itself is driven by the caller (see [`crate::app`]).

use crate::output::csv::render_csv;
use crate::registry::{CharacteristicId, Registry};
use chrono::{Local, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// `strftime` pattern for log timestamps, e.g. `2024/01/31 08:05:09`.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Errors from log state transitions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogError {
    #[error("Logging already started")]
    AlreadyLogging,
}

/// Local wall-clock time rendered as `YYYY/MM/DD HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        Self(datetime.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of log timestamps.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Clock backed by the system's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(&Local::now().naive_local())
    }
}

/// Values captured at one tick, keyed by characteristic.
pub type LogRow = HashMap<CharacteristicId, String>;

/// Logging state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogState {
    #[default]
    Idle,
    Logging,
}

/// Accumulates timestamped rows of characteristic values.
#[derive(Debug, Default)]
pub struct DataLog {
    state: LogState,
    rows: Vec<(Timestamp, LogRow)>,
    index: HashMap<Timestamp, usize>,
}

impl DataLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LogState {
        self.state
    }

    pub fn is_logging(&self) -> bool {
        self.state == LogState::Logging
    }

    /// Number of rows currently held.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = (&Timestamp, &LogRow)> {
        self.rows.iter().map(|(timestamp, row)| (timestamp, row))
    }

    /// Discard previous rows and start logging.
    ///
    /// A second start while logging is rejected and leaves the rows untouched.
    pub fn start(&mut self) -> Result<(), LogError> {
        if self.is_logging() {
            return Err(LogError::AlreadyLogging);
        }
        self.rows.clear();
        self.index.clear();
        self.state = LogState::Logging;
        info!("Logging started");
        Ok(())
    }

    /// Capture the registry's last values under `timestamp`.
    ///
    /// Ignored while idle.
    pub fn tick(&mut self, registry: &Registry, timestamp: Timestamp) {
        if !self.is_logging() {
            debug!("Tick while idle ignored");
            return;
        }

        let row: LogRow = registry
            .iter()
            .map(|record| (record.id.clone(), record.last_value.clone()))
            .collect();

        match self.index.get(&timestamp) {
            Some(&position) => {
                debug!("Replacing log row {timestamp}");
                self.rows[position].1 = row;
            }
            None => {
                self.index.insert(timestamp.clone(), self.rows.len());
                self.rows.push((timestamp, row));
            }
        }
    }

    /// Stop logging and render the log as CSV.
    ///
    /// Returns `None` when idle or when no rows were captured. Rows are kept
    /// until the next [`DataLog::start`].
    pub fn stop(&mut self, registry: &Registry) -> Option<String> {
        if !self.is_logging() {
            warn!("Stop requested while not logging");
            return None;
        }
        self.state = LogState::Idle;
        info!("Logging stopped after {} rows", self.rows.len());

        if self.rows.is_empty() {
            return None;
        }
        Some(render_csv(&registry.snapshot(), self.rows()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{Format, PresentationInfo};
    use crate::test_utils::{StepClock, celsius_centi, percent};

    fn ts(s: &str) -> Timestamp {
        Timestamp(s.to_string())
    }

    #[test]
    fn test_timestamp_format() {
        let datetime = chrono::NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(8, 5, 9)
            .unwrap();
        assert_eq!(
            Timestamp::from_datetime(&datetime).as_str(),
            "2024/01/31 08:05:09"
        );
    }

    #[test]
    fn test_local_clock_shape() {
        let now = LocalClock.now();
        let s = now.as_str();
        assert_eq!(s.len(), 19);
        assert_eq!(&s[4..5], "/");
        assert_eq!(&s[7..8], "/");
        assert_eq!(&s[10..11], " ");
        assert_eq!(&s[13..14], ":");
    }

    #[test]
    fn test_state_machine() {
        let registry = Registry::new();
        let mut log = DataLog::new();
        assert_eq!(log.state(), LogState::Idle);

        log.start().unwrap();
        assert_eq!(log.state(), LogState::Logging);
        assert_eq!(log.start(), Err(LogError::AlreadyLogging));

        log.stop(&registry);
        assert_eq!(log.state(), LogState::Idle);
        log.start().unwrap();
    }

    #[test]
    fn test_duplicate_start_keeps_rows() {
        let registry = Registry::new();
        let mut log = DataLog::new();
        log.start().unwrap();
        log.tick(&registry, ts("2024/01/01 00:00:00"));
        assert!(log.start().is_err());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_tick_while_idle_ignored() {
        let registry = Registry::new();
        let mut log = DataLog::new();
        log.tick(&registry, ts("2024/01/01 00:00:00"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_same_second_ticks_merge_into_later_row() {
        let mut registry = Registry::new();
        registry.register("a".into(), "Level", "Battery", percent());
        let mut log = DataLog::new();
        log.start().unwrap();

        registry.record_value(&"a".into(), "80");
        log.tick(&registry, ts("2024/01/01 00:00:00"));
        registry.record_value(&"a".into(), "79");
        log.tick(&registry, ts("2024/01/01 00:00:00"));

        assert_eq!(log.len(), 1);
        let (_, row) = log.rows().next().unwrap();
        assert_eq!(row.get(&"a".into()).map(String::as_str), Some("79"));
    }

    #[test]
    fn test_replaced_row_keeps_position() {
        let mut registry = Registry::new();
        registry.register("a".into(), "Level", "Battery", percent());
        let mut log = DataLog::new();
        log.start().unwrap();

        log.tick(&registry, ts("2024/01/01 00:00:00"));
        log.tick(&registry, ts("2024/01/01 00:00:01"));
        registry.record_value(&"a".into(), "5");
        log.tick(&registry, ts("2024/01/01 00:00:00"));

        let stamps: Vec<&str> = log.rows().map(|(t, _)| t.as_str()).collect();
        assert_eq!(stamps, vec!["2024/01/01 00:00:00", "2024/01/01 00:00:01"]);
    }

    #[test]
    fn test_stop_without_rows_returns_none() {
        let registry = Registry::new();
        let mut log = DataLog::new();
        log.start().unwrap();
        assert_eq!(log.stop(&registry), None);
        assert_eq!(log.stop(&registry), None);
    }

    #[test]
    fn test_rows_kept_until_next_start() {
        let registry = Registry::new();
        let mut log = DataLog::new();
        log.start().unwrap();
        log.tick(&registry, ts("2024/01/01 00:00:00"));
        assert!(log.stop(&registry).is_some());
        assert_eq!(log.len(), 1);

        log.start().unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_end_to_end_csv() {
        let mut registry = Registry::new();
        registry.register("batt".into(), "Level", "Battery", percent());
        registry.register("temp".into(), "Temperature", "Env", celsius_centi());
        registry.record_value(&"batt".into(), "80");
        registry.record_value(&"temp".into(), "23.45");

        let clock = StepClock::new(2024, 1, 1, 12, 0, 0);
        let mut log = DataLog::new();
        log.start().unwrap();
        log.tick(&registry, clock.now());
        log.tick(&registry, clock.now());
        let csv = log.stop(&registry).unwrap();

        assert_eq!(
            csv,
            "Timestamp,Battery,Env\n\
             ,Level,Temperature\n\
             ,%,°C\n\
             2024/01/01 12:00:00,80,23.45\n\
             2024/01/01 12:00:01,80,23.45\n"
        );
    }

    #[test]
    fn test_characteristic_added_mid_log_has_empty_fields() {
        let mut registry = Registry::new();
        registry.register("a".into(), "A", "S", percent());
        registry.record_value(&"a".into(), "1");

        let mut log = DataLog::new();
        log.start().unwrap();
        log.tick(&registry, ts("2024/01/01 00:00:00"));

        registry.register(
            "b".into(),
            "B",
            "S",
            PresentationInfo::new(Format::UInt8, 0, 0x2700),
        );
        registry.record_value(&"b".into(), "2");
        log.tick(&registry, ts("2024/01/01 00:00:01"));

        let csv = log.stop(&registry).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[3], "2024/01/01 00:00:00,1,");
        assert_eq!(lines[4], "2024/01/01 00:00:01,1,2");
    }
}
