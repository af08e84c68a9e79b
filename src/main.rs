// src/main.rs
// dailyquote - random quotation server

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use dailyquote::api::create_router;
use dailyquote::catalog::Catalog;
use dailyquote::config::{ConfigArgs, ServerConfig};
use dailyquote::state::AppState;

/// How often idle sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Parser)]
#[command(name = "dailyquote")]
#[command(about = "Serve random quotes without repeats until a category is exhausted")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Load the quotes file and list its categories
    Check,
}

/// Graceful shutdown signal handler for SIGTERM and Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}

fn load_catalog(config: &ServerConfig) -> Result<Catalog> {
    Catalog::load(&config.quotes, &config.default_category)
        .with_context(|| format!("failed to load quotes from {}", config.quotes.display()))
}

async fn run_server(config: ServerConfig) -> Result<()> {
    let catalog = load_catalog(&config)?;
    for name in catalog.categories() {
        if catalog.item_count(name) == Some(0) {
            warn!(category = %name, "Category is empty; requests for it will fail");
        }
    }

    let state = AppState::new(catalog, config.session_ttl());

    // Sweep idle sessions in the background
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sessions.purge_expired();
        }
    });

    if let Some(dir) = &config.static_dir {
        info!("Serving frontend from {}", dir.display());
    }
    let app = create_router(state, config.static_dir.as_deref());

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!("dailyquote listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

fn run_check(config: &ServerConfig) -> Result<()> {
    let catalog = load_catalog(config)?;
    for name in catalog.categories() {
        let count = catalog.item_count(name).unwrap_or(0);
        let note = if count == 0 { "  (empty)" } else { "" };
        println!("{name}\t{count}{note}");
    }
    println!(
        "{} categories, {} quotes",
        catalog.categories().len(),
        catalog.total_quotes()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv(); // Load .env from current directory

    let cli = Cli::parse();
    let config = ServerConfig::resolve(&cli.config)?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None | Some(Commands::Serve) => run_server(config).await?,
        Some(Commands::Check) => run_check(&config)?,
    }

    Ok(())
}
