use crate::datalog::{Clock, Timestamp};
use crate::output::Sink;
use crate::presentation::{Format, PresentationInfo};
use crate::registry::CharacteristicId;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::cell::Cell;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Battery level: uint8, percent.
pub fn percent() -> PresentationInfo {
    PresentationInfo::new(Format::UInt8, 0, 0x27AD)
}

/// Temperature in hundredths of a degree Celsius.
pub fn celsius_centi() -> PresentationInfo {
    PresentationInfo::new(Format::SInt16, -2, 0x272F)
}

/// Clock that starts at a fixed local time and advances one second per call.
#[derive(Debug)]
pub struct StepClock {
    next: Cell<NaiveDateTime>,
}

impl StepClock {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        let start = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, min, sec))
            .expect("valid test date");
        Self {
            next: Cell::new(start),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> Timestamp {
        let current = self.next.get();
        self.next.set(current + TimeDelta::seconds(1));
        Timestamp::from_datetime(&current)
    }
}

/// Sink that keeps everything it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// `(id, value, unit)` per update.
    pub values: Vec<(String, String, String)>,
    pub exports: Vec<String>,
}

impl Sink for RecordingSink {
    fn value_updated(&mut self, id: &CharacteristicId, value: &str, unit: &str) -> io::Result<()> {
        self.values
            .push((id.to_string(), value.to_string(), unit.to_string()));
        Ok(())
    }

    fn log_exported(&mut self, csv: &str) -> io::Result<()> {
        self.exports.push(csv.to_string());
        Ok(())
    }
}

/// Shared buffer collecting formatted log output.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a `warn`-level subscriber and return its result together
/// with everything that was logged.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.contents())
}
