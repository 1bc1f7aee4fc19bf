use clap::Parser;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kg_explorer::{
    cli::{execute_command, Cli},
    config::Config,
    storage::{SqliteStorage, Storage, API_TOKEN_KEY},
    transport::NotificationQueue,
    Explorer, KgApi, QueryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "KG Explorer starting...");

    // Initialize storage
    let storage: Arc<dyn Storage> = match SqliteStorage::new(&config.storage).await {
        Ok(s) => {
            info!(path = %config.storage.path.display(), "Storage initialized");
            Arc::new(s)
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize storage");
            return Err(e.into());
        }
    };

    if let Some(token) = &config.api.token {
        if let Err(e) = storage.set_item(API_TOKEN_KEY, token).await {
            warn!(error = %e, "Failed to store API token");
        }
    }

    // Initialize API facade
    let notifications = Arc::new(NotificationQueue::new());
    let api = match KgApi::from_config(&config, notifications.clone(), storage.clone()) {
        Ok(api) => api,
        Err(e) => {
            error!(error = %e, "Failed to initialize API client");
            return Err(e.into());
        }
    };

    let store = Arc::new(QueryStore::load(storage).await);
    let explorer = Explorer::new(api, store);

    let result = execute_command(cli.command, &explorer).await;

    let shown = notifications.drain();
    for notification in &shown {
        eprintln!("[{}] {}", notification.created_at.format("%H:%M:%S"), notification.message);
    }

    if result.exit_code == 0 {
        println!("{}", result.message);
    } else {
        // Errors already shown as notifications are not repeated.
        if shown.is_empty() {
            eprintln!("{}", result.message);
        }
        std::process::exit(result.exit_code);
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        kg_explorer::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        kg_explorer::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
