//! Serves one conferencing room over WebSocket.
//!
//! ```bash
//! roomjoint --config room.toml
//! ROOMJOINT_BIND_ADDR=0.0.0.0:9000 roomjoint
//! ```

use clap::Parser;
use roomjoint::config::JointConfig;
use roomjoint::joint::axum::AxumJoint;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "roomjoint", version, about = "Conference room sidebar server")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match JointConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured filter
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_filter.as_str().into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut joint = AxumJoint::new(&config.room);
    if let Err(e) = joint.bind(&config.bind_addr).await {
        tracing::error!("Error: failed to bind {}: {}", config.bind_addr, e);
        std::process::exit(1);
    }
    if let Err(e) = joint.serve(&config.ws_path).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
