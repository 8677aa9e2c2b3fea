//! panelkit Host
//!
//! Serves the side panel's widget functions over stdio: one JSON-RPC
//! request per line in, one response per line out. Logs go to stderr.

mod config;
mod rpc;

use std::io::{self, BufRead, IsTerminal, Write};
use panelkit_plugin::PluginRegistry;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::HostConfig;
use rpc::{Host, PROTOCOL_VERSION, SERVER_VERSION};

fn init_logging(config: &HostConfig) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

fn create_registry() -> PluginRegistry {
    panelkit_units::load_units_library(PluginRegistry::new())
}

fn main() {
    let config = HostConfig::from_env();
    init_logging(&config);

    let host = Host::new(create_registry(), config.trace);

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, trace = config.trace, "panelkit host started");

    let stdin = io::stdin();
    let mut reader = stdin.lock();

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let Some(response) = host.handle_line(&line) else {
                    continue;
                };

                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", response).and_then(|_| stdout.flush()) {
                    error!(error = %e, "failed to write response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        }
    }

    info!("host shutting down");
}
