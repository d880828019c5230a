//! Server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: database init, migrations,
//! upload directory, HTTP API, metrics and graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::DomainResult;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{GoogleProvider, OAuthProvider};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::init_database;

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the server.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running server.
///
/// ```rust,no_run
/// use circles::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Port the API is listening on.
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

/// The process-wide Prometheus recorder. It can only be installed once,
/// so a restart within the same process reuses it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

fn oauth_provider(config: &AppConfig) -> DomainResult<Option<Arc<dyn OAuthProvider>>> {
    let Some(google) = &config.oauth.google else {
        warn!("Google sign-in is not configured; creating listings is disabled");
        return Ok(None);
    };
    let provider =
        GoogleProvider::new(&google.client_id, &google.client_secret, &google.redirect_url)?;
    info!("🔑 Google sign-in enabled");
    Ok(Some(Arc::new(provider)))
}

impl ServerHandle {
    /// Start the server with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder
    /// 2. Connect to the database and run migrations
    /// 3. Prepare the upload directory and sweep unprocessed uploads
    /// 4. Start the HTTP API (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let config = opts.config;
        config.validate()?;

        info!("Starting Circles...");
        if config.uses_dev_session_secret() {
            warn!("⚠️  Using the built-in session secret; set SECRET_KEY in production");
        }

        let prometheus = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db = init_database(&config.database.to_database_config()).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Services ───────────────────────────────────────────
        let state = AppState::new(db.clone(), &config, oauth_provider(&config)?);

        state.images.ensure_root().await?;
        state.images.sweep_originals().await;
        info!("📁 Uploads stored in {}", state.images.root().display());

        // ── HTTP API ───────────────────────────────────────────
        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let router = create_api_router(state, &config, prometheus);

        let addr = config.address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let api_port = listener.local_addr()?.port();
        info!("HTTP API listening on http://{}", addr);
        info!("Swagger UI available at http://{}/docs/", addr);

        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 HTTP server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("HTTP server error: {}", e);
            }
        });

        info!("🚀 Server started.");

        Ok(Self {
            config,
            api_port,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for shutdown to be triggered, let in-flight requests finish
    /// within the configured timeout, then close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!("HTTP server task failed: {}", e);
                }
                match db.close().await {
                    Ok(()) => info!("Database connection closed"),
                    Err(e) => warn!("Error closing database connection: {}", e),
                }
            })
            .await;

        info!("👋 Circles shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` wins over `logging.level`. Call once at process startup.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
