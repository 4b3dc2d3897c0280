//! Skirmish -- a two-player 5x5 tactics game server.
//!
//! Accepts WebSocket connections carrying `{type,data}` JSON envelopes,
//! pairs participants into matches and referees their moves.

use std::env;
use std::net::TcpListener;
use std::process;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use skirmish::config::{CliAction, ServerConfig, DEFAULT_LOG_FILTER, USAGE};
use skirmish::server;
use skirmish::session::SessionRegistry;

fn main() {
    let config = match ServerConfig::from_args(env::args().skip(1)) {
        Ok(CliAction::Run(config)) => config,
        Ok(CliAction::Help) => {
            println!("{}", USAGE);
            return;
        }
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let filter = match &config.log_filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let listener = match TcpListener::bind(config.bind) {
        Ok(l) => l,
        Err(e) => {
            error!(addr = %config.bind, error = %e, "failed to bind");
            process::exit(1);
        }
    };

    info!("Skirmish server v{}", env!("CARGO_PKG_VERSION"));
    match listener.local_addr() {
        Ok(addr) => info!(%addr, "listening"),
        Err(_) => info!(addr = %config.bind, "listening"),
    }

    let registry = Arc::new(SessionRegistry::new());
    if let Err(e) = server::serve(listener, registry) {
        error!(error = %e, "server stopped");
        process::exit(1);
    }
}
