use clap::Parser;
use gatt_logger::app::{Options, run_with_io};
use gatt_logger::datalog::LocalClock;
use gatt_logger::transport::lines::StdinTransport;
use std::panic::{self, PanicHookInfo};
use tracing_subscriber::EnvFilter;

/// Exit codes for the application
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_PANIC: i32 = 2;

/// Install the stderr log subscriber.
///
/// `--quiet` and `--verbose` override `RUST_LOG`, which defaults to `info`.
fn init_tracing(options: &Options) {
    let filter = if options.quiet {
        EnvFilter::new("warn")
    } else if options.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set up panic hook to ensure clean exit codes for the process feeding us
    panic::set_hook(Box::new(move |info: &PanicHookInfo| {
        eprintln!("Panic! {}", info);
        std::process::exit(EXIT_PANIC);
    }));

    let options = Options::parse();
    init_tracing(&options);

    let mut stdout = std::io::stdout();
    match run_with_io(options, &StdinTransport, LocalClock, &mut stdout).await {
        Ok(_) => std::process::exit(EXIT_SUCCESS),
        Err(why) => {
            eprintln!("error: {}", why);
            std::process::exit(EXIT_ERROR);
        }
    }
}
