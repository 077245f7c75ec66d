//! Command-line argument parsing

use clap::Parser;

/// Scriptable console for Wi-Fi Direct device pairing workflows.
///
/// Reads one command per line from stdin; pipe a script in for batch use.
/// The process exit status is the accumulated session exit code.
#[derive(Parser, Debug)]
#[command(name = "wfd-console")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Seed the simulated backend with a discoverable device (repeatable)
    #[arg(long = "sim-device", value_name = "NAME")]
    pub sim_devices: Vec<String>,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log: String,
}
