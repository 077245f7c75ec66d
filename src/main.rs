mod cli;
mod command;
mod directory;
mod interp;
mod pairing;
mod wfd;

use clap::Parser;
use directory::{DeviceDirectory, DeviceInfo};
use interp::{Interrupt, Session};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let args = cli::Cli::parse();

    // Diagnostics go to stderr so stdout stays clean for scripted use
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log.clone())),
        )
        .init();

    let interactive = std::io::stdin().is_terminal();
    if interactive {
        println!("{}\n", command::VERSION_BANNER);
    }

    // Discovery feed into the directory; runs for the whole session
    let devices: Vec<DeviceInfo> = args
        .sim_devices
        .iter()
        .enumerate()
        .map(|(i, name)| DeviceInfo::new(format!("sim-{i:02}"), name.clone()))
        .collect();
    info!("simulated backend with {} seeded device(s)", devices.len());

    let directory = DeviceDirectory::new();
    let _feed = directory.attach(wfd::discovery_feed(devices));

    let provider = Arc::new(wfd::SimWfd::with_latency(Duration::from_millis(200)));

    let interrupt = Interrupt::new();
    let _signals = interrupt.install();

    let mut session = Session::new(directory, provider, interrupt, interactive);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let code = session.run(stdin).await;

    std::process::exit(code);
}
