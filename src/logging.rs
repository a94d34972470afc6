use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initializes console logging on stderr.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `info`, raised by
/// each `-v`. Stdout is left to reports and ASCII charts.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("market_dash={level}")));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
