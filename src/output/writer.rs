//! [`Sink`] implementation writing to an `io::Write` and the filesystem.

use crate::format::display_string;
use crate::output::Sink;
use crate::registry::CharacteristicId;
use chrono::Local;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where exported logs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Write the CSV to the sink's writer.
    Writer,
    /// Write the CSV to this file, replacing it. When the path is an existing
    /// directory, a timestamped file name is generated inside it.
    Path(PathBuf),
}

/// Writes live values as lines and exports logs to an [`ExportTarget`].
pub struct WriterSink<'a> {
    out: &'a mut dyn Write,
    live: bool,
    export: ExportTarget,
}

impl<'a> WriterSink<'a> {
    /// # Arguments
    /// * `out` - Destination for live value lines (and CSV for [`ExportTarget::Writer`])
    /// * `live` - Whether to print a line for every value update
    /// * `export` - Where exported logs go
    pub fn new(out: &'a mut dyn Write, live: bool, export: ExportTarget) -> Self {
        Self { out, live, export }
    }
}

impl Sink for WriterSink<'_> {
    fn value_updated(&mut self, id: &CharacteristicId, value: &str, unit: &str) -> io::Result<()> {
        if self.live {
            writeln!(self.out, "{id} {}", display_string(value, unit))?;
        }
        Ok(())
    }

    fn log_exported(&mut self, csv: &str) -> io::Result<()> {
        match &self.export {
            ExportTarget::Writer => self.out.write_all(csv.as_bytes()),
            ExportTarget::Path(path) => {
                let path = export_path(path);
                fs::write(&path, csv)?;
                info!("Log exported to {}", path.display());
                Ok(())
            }
        }
    }
}

/// Resolve a configured export path, generating a file name for directories.
fn export_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        path.join(format!("gatt_log_{timestamp}.csv"))
    } else {
        path.to_path_buf()
    }
}
