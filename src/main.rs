//! Circles server
//!
//! ```sh
//! # Run with default config (~/.config/circles/config.toml)
//! circles-service
//!
//! # Custom config path and port
//! circles-service --config /etc/circles/config.toml --port 8080
//!
//! # Validate config without starting
//! circles-service --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use circles::config::AppConfig;
use circles::server::{init_tracing, ServerHandle, ServerOptions};

/// Circles: student club directory with faceted search.
#[derive(Parser, Debug)]
#[command(
    name = "circles-service",
    version,
    about = "Student club directory with faceted search and view statistics",
    long_about = "Circles HTTP server: listing search, listing management behind \
                  per-listing passwords, Google sign-in and view statistics.\n\n\
                  Default config: ~/.config/circles/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CIRCLES_CONFIG")]
    config: Option<PathBuf>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(circles::default_config_path);
    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    if cli.check {
        return match config.validate() {
            Ok(()) => {
                let url = config.database.connection_url();
                let driver = url.split(':').next().unwrap_or_default();
                println!("✅ Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   Address     : {}", config.address());
                println!("   Database    : {}", driver);
                println!("   Uploads     : {}", config.uploads.dir.display());
                println!("   Google auth : {}", config.oauth.google.is_some());
                println!("   Log level   : {}", config.logging.level);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Invalid configuration: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;
    ExitCode::SUCCESS
}
