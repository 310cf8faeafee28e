//! Applies transport events to the registry and the value log.
//!
//! All state lives on one task; every method is synchronous and non-blocking.

use crate::codec::decode_or_zero;
use crate::datalog::{Clock, DataLog, LogError};
use crate::format::format_value;
use crate::output::Sink;
use crate::presentation::parse_presentation;
use crate::registry::{CharacteristicId, Registry};
use crate::transport::GattEvent;
use crate::unit::{lookup_unit, unit_label};
use std::io;
use tracing::{debug, info, warn};

/// Registry and log for one run, plus the clock that stamps log rows.
#[derive(Debug)]
pub struct Session<C> {
    registry: Registry,
    log: DataLog,
    clock: C,
}

impl<C: Clock> Session<C> {
    pub fn new(clock: C) -> Self {
        Self {
            registry: Registry::new(),
            log: DataLog::new(),
            clock,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn log(&self) -> &DataLog {
        &self.log
    }

    pub fn is_logging(&self) -> bool {
        self.log.is_logging()
    }

    /// Apply one transport event, reporting value updates and exports to `sink`.
    ///
    /// Decode problems are logged and absorbed; only sink I/O errors are returned.
    pub fn handle(&mut self, event: GattEvent, sink: &mut dyn Sink) -> io::Result<()> {
        match event {
            GattEvent::Connected => {
                info!("Connecting, clearing {} characteristics", self.registry.len());
                self.registry.clear();
                Ok(())
            }
            GattEvent::Disconnected => {
                info!("Disconnected");
                // Export while the columns are still known.
                if self.is_logging() {
                    self.stop_log(sink)?;
                }
                self.registry.clear();
                Ok(())
            }
            GattEvent::Discovered {
                id,
                service,
                name,
                descriptor,
            } => {
                self.discover(id, service, name, &descriptor);
                Ok(())
            }
            GattEvent::Value { id, data } => self.update_value(&id, &data, sink),
            GattEvent::StartLog => {
                if let Err(e) = self.start_log() {
                    warn!("{e}");
                }
                Ok(())
            }
            GattEvent::StopLog => self.stop_log(sink),
        }
    }

    fn discover(&mut self, id: CharacteristicId, service: String, name: String, descriptor: &[u8]) {
        match parse_presentation(descriptor) {
            Ok(presentation) => {
                let unit = unit_label(presentation.unit);
                debug!(
                    "{service}/{name}: {} exponent {} unit '{unit}'",
                    presentation.format, presentation.exponent
                );
                self.registry.register(id, name, service, presentation);
            }
            Err(e) => warn!("Characteristic {id} ({service}/{name}) not registered: {e}"),
        }
    }

    fn update_value(
        &mut self,
        id: &CharacteristicId,
        data: &[u8],
        sink: &mut dyn Sink,
    ) -> io::Result<()> {
        let Some(presentation) = self.registry.get(id).map(|record| record.presentation) else {
            warn!("Value for unknown characteristic {id} ignored");
            return Ok(());
        };

        let value = decode_or_zero(data, &presentation);
        let formatted = format_value(value, &presentation);
        debug!("{id}: {value} -> {formatted}");
        // Unknown units were already reported at discovery.
        let unit = lookup_unit(presentation.unit).unwrap_or("");

        self.registry.record_value(id, formatted.clone());
        sink.value_updated(id, &formatted, unit)
    }

    /// Start logging with an empty log.
    pub fn start_log(&mut self) -> Result<(), LogError> {
        self.log.start()
    }

    /// Capture one log row stamped with the current time.
    pub fn tick(&mut self) {
        let timestamp = self.clock.now();
        self.log.tick(&self.registry, timestamp);
    }

    /// Stop logging and hand the CSV, if any rows were captured, to `sink`.
    pub fn stop_log(&mut self, sink: &mut dyn Sink) -> io::Result<()> {
        match self.log.stop(&self.registry) {
            Some(csv) => sink.log_exported(&csv),
            None => Ok(()),
        }
    }
}
