//! RetroHost presentation layer
//!
//! Serves the ROM catalog, ROM files and save slots over HTTP and renders the
//! same catalog as text tables for the command line.

pub mod cli;
pub mod http;

/// Install the tracing subscriber; logs go to stderr so CLI output stays clean
pub fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
