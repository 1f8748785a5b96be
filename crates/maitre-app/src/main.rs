//! Maitre kiosk server binary - composition root.
//!
//! 1. Parse CLI args and resolve configuration (CLI > env > file > defaults)
//! 2. Initialize tracing
//! 3. Load the venue knowledge base (file or compiled-in)
//! 4. Build the dialogue engine and voice controller
//! 5. Serve the axum API until ctrl-c

mod cli;

use clap::Parser;

use maitre_api::{routes, AppState};
use maitre_core::config::MaitreConfig;
use maitre_kb::KnowledgeBase;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = MaitreConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    config.general.log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Maitre v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Knowledge base.
    let kb = match args.resolve_kb_path(config.kb.venue_path.as_deref()) {
        Some(path) => {
            let kb = KnowledgeBase::from_toml_file(&path)?;
            tracing::info!(path = %path.display(), venue = %kb.name, "Venue loaded from file");
            kb
        }
        None => {
            let kb = KnowledgeBase::default_venue();
            tracing::info!(venue = %kb.name, "Using compiled-in venue");
            kb
        }
    };

    // Engine + controller + API state.
    let state = AppState::new(config, kb);

    // Serve until ctrl-c.
    tokio::select! {
        result = routes::start_server(state) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
