//! torero-api — serve the torero CLI over HTTP.
//!
//! Two subcommands:
//! - `torero-api serve`: start the REST API
//! - `torero-api check`: report whether torero is reachable, and its version

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use torero_api::{router, ToreroApiConfig, ToreroExecutor};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE_NAME: &str = "torero-api.toml";

/// torero-api — REST facade over the torero CLI.
#[derive(Parser)]
#[command(
    name = "torero-api",
    version,
    about = "torero-api — REST facade over the torero CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Path to torero-api.toml [default: ./torero-api.toml or ~/.config/torero-api/torero-api.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// HTTP port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,
    },
    /// Check that torero is installed and answering, then exit
    Check {
        /// Path to torero-api.toml [default: ./torero-api.toml or ~/.config/torero-api/torero-api.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, port, host } => {
            let mut config = load_config(resolve_config(config).as_deref()).await?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            config
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

            let cancel = CancellationToken::new();

            // Ctrl-C handler — cancels the root token for graceful shutdown
            let cancel_for_signal = cancel.clone();
            tokio::spawn(async move {
                tokio::signal::ctrl_c().await.ok();
                tracing::info!("Shutting down torero-api...");
                cancel_for_signal.cancel();
            });

            run_serve(config, cancel).await?;
        }
        Commands::Check { config } => {
            let config = load_config(resolve_config(config).as_deref()).await?;
            config
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
            run_check(config).await?;
        }
    }

    Ok(())
}

/// Probe torero, log its status, then bind and serve until cancelled.
async fn run_serve(config: ToreroApiConfig, cancel: CancellationToken) -> Result<()> {
    let executor = ToreroExecutor::new(&config.torero);

    let status = executor.probe().await;
    if status.available {
        tracing::info!(version = %status.version, "torero is available");
    } else {
        // Not fatal: the API still starts and reports the problem on /health.
        tracing::warn!(message = %status.message, "torero is not available");
    }

    let app = router(executor);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        "torero-api listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| anyhow::anyhow!("torero-api HTTP server error: {}", e))?;

    tracing::info!("torero-api stopped");
    Ok(())
}

/// Print torero's availability and version; fail when it is unavailable.
async fn run_check(config: ToreroApiConfig) -> Result<()> {
    let executor = ToreroExecutor::new(&config.torero);
    let status = executor.probe().await;

    println!("binary:    {}", executor.binary());
    println!("available: {}", status.available);
    println!("version:   {}", status.version);
    println!("message:   {}", status.message);

    if !status.available {
        anyhow::bail!("torero is not available: {}", status.message);
    }
    Ok(())
}

/// Resolve config file path: explicit flag → ./torero-api.toml → ~/.config/torero-api/torero-api.toml.
///
/// Returns `None` when no file exists; built-in defaults are used then.
fn resolve_config(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path);
    }

    let local = Path::new(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local.to_path_buf());
    }

    dirs::config_dir()
        .map(|dir| dir.join("torero-api").join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Load and parse a torero-api.toml config file, or fall back to defaults.
async fn load_config(config_path: Option<&Path>) -> Result<ToreroApiConfig> {
    let Some(config_path) = config_path else {
        tracing::debug!("no config file found, using defaults");
        return Ok(ToreroApiConfig::default());
    };

    let content = tokio::fs::read_to_string(config_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", config_path, e))?;
    let config: ToreroApiConfig = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file {:?}: {}", config_path, e))?;
    tracing::debug!(path = ?config_path, "loaded config");
    Ok(config)
}
