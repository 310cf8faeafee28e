//! Core application runner for `gatt-logger`.
//!
//! This module is decoupled from CLI parsing and process exit codes so it can be
//! tested deterministically with an injected transport, clock and output.

use crate::datalog::Clock;
use crate::output::writer::{ExportTarget, WriterSink};
use crate::session::Session;
use crate::transport::{GattEvent, TransportError};
use clap::Parser;
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Configuration for the core run loop.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// Interval between log rows.
    /// Accepts duration with suffix: 500ms, 1s, 1m, 2h.
    /// Without suffix, value is interpreted as seconds.
    #[arg(long, default_value = "1s", value_parser = crate::duration::parse_period)]
    pub period: Duration,

    /// Write exported CSV logs to this file (or a generated file name inside
    /// this directory) instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Start logging immediately instead of waiting for a `log start` event.
    #[arg(long)]
    pub log: bool,

    /// Do not print live value updates.
    #[arg(long)]
    pub no_live: bool,

    /// Verbose output, print debug diagnostics
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            output: None,
            log: false,
            no_live: false,
            verbose: false,
            quiet: false,
        }
    }
}

/// Errors returned by the core run loop.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Transport abstraction to enable deterministic unit tests without Bluetooth hardware.
pub trait Transport: Send + Sync {
    fn open(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<mpsc::Receiver<GattEvent>, TransportError>> + Send + '_>>;
}

/// Run a session until the transport closes its event channel.
///
/// - Events are applied in arrival order; live values are written to `out`
///   unless `options.no_live` is set.
/// - While logging, a row is captured every `options.period`.
/// - When the channel closes while logging, the log is stopped and exported.
pub async fn run_with_io<C: Clock>(
    options: Options,
    transport: &dyn Transport,
    clock: C,
    out: &mut dyn Write,
) -> Result<(), RunError> {
    let export = match options.output {
        Some(path) => ExportTarget::Path(path),
        None => ExportTarget::Writer,
    };
    let mut sink = WriterSink::new(out, !options.no_live, export);
    let mut session = Session::new(clock);
    let mut ticker: Option<Interval> = None;

    let mut events = transport.open().await?;

    if options.log && let Err(e) = session.start_log() {
        debug!("{e}");
    }

    loop {
        sync_ticker(&mut ticker, session.is_logging(), options.period);

        tokio::select! {
            biased;

            _ = next_tick(&mut ticker) => session.tick(),
            event = events.recv() => match event {
                Some(event) => session.handle(event, &mut sink)?,
                None => break,
            },
        }
    }

    info!("Event stream closed");
    if session.is_logging() {
        session.stop_log(&mut sink)?;
    }

    Ok(())
}

/// Create the timer when logging starts and drop it when logging stops, so
/// no tick can fire after a stop.
fn sync_ticker(ticker: &mut Option<Interval>, logging: bool, period: Duration) {
    match (logging, ticker.is_some()) {
        (true, false) => {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            *ticker = Some(interval);
        }
        (false, true) => *ticker = None,
        _ => {}
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
