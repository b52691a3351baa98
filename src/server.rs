//! Reusable marina service runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! store init, migrations, services, REST API, metrics and graceful
//! shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::{init_database, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, ServerContext};
use crate::shared::errors::AppError;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the marina service.
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

// ── Storage ────────────────────────────────────────────────────────

/// The repository provider plus the SQL connection behind it, if any.
pub struct Storage {
    pub repos: Arc<dyn RepositoryProvider>,
    pub db: Option<DatabaseConnection>,
}

impl Storage {
    /// Connect to the configured database, or build the in-memory store
    /// when the URL is `memory`.
    pub async fn open(config: &AppConfig, auto_migrate: bool) -> Result<Self, AppError> {
        if config.database.is_memory() {
            warn!("Using the in-memory store; data is lost on exit");
            return Ok(Self {
                repos: Arc::new(InMemoryRepositoryProvider::new()),
                db: None,
            });
        }

        let mut db_config = config.database.connection();
        db_config.run_migrations = db_config.run_migrations && auto_migrate;
        let db = init_database(&db_config).await?;
        Ok(Self {
            repos: Arc::new(SeaOrmRepositoryProvider::new(db.clone())),
            db: Some(db),
        })
    }

    pub async fn close(self) {
        close_database(self.db).await;
    }
}

async fn close_database(db: Option<DatabaseConnection>) {
    if let Some(db) = db {
        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running marina service.
///
/// ```rust,no_run
/// use marina::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the API is bound to.
    pub local_addr: std::net::SocketAddr,
    /// Origin used for absolute links.
    pub base_url: String,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the service: metrics recorder, store, services, REST API.
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let app_cfg = opts.config;

        info!("Starting marina service...");

        let prometheus_handle = prometheus_handle();

        let storage = Storage::open(&app_cfg, opts.auto_migrate).await?;
        let Storage { repos, db } = storage;

        let rule = app_cfg.interval_rule();
        info!(interval_rule = %rule, "Reservation interval rule");

        // Resolved once; handlers never look at the environment.
        let base_url = app_cfg.server.base_url();

        let ctx = ServerContext::new(
            repos.clone(),
            rule,
            app_cfg.session.clone(),
            base_url.clone(),
            db.clone(),
            prometheus_handle,
        );
        let api_router = create_api_router(ctx);

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let api_addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at {}/docs/", base_url);

        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Marina service started.");

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            base_url,
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

    /// Wait for shutdown to be triggered, let in-flight requests drain
    /// within the configured timeout, then close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let abort = api_task.abort_handle();
        let drained = shutdown
            .shutdown_with_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task failed: {}", e),
                }
            })
            .await;
        if !drained {
            abort.abort();
        }

        close_database(db).await;

        info!("👋 Marina service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down marina service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global metrics recorder can only be installed once per process;
/// later starts reuse it. If another recorder is already installed the
/// booking counters go there and `/metrics` renders an empty registry.
pub fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            match metrics::set_global_recorder(recorder) {
                Ok(()) => info!("📊 Prometheus metrics recorder installed"),
                Err(e) => warn!("Prometheus recorder not installed: {}", e),
            }
            handle
        })
        .clone()
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
/// `RUST_LOG` takes precedence over `[logging].level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database.url = "memory".to_string();
        config.server.api_host = "127.0.0.1".to_string();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 5;
        config
    }

    #[tokio::test]
    async fn starts_and_stops_on_memory_store() {
        let handle = ServerHandle::start(ServerOptions {
            config: memory_config(),
            auto_migrate: true,
        })
        .await
        .unwrap();
        assert!(handle.is_running());
        assert_ne!(handle.local_addr.port(), 0);
        assert_eq!(handle.base_url, "http://127.0.0.1:0");
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn sqlite_storage_runs_migrations() {
        let mut config = memory_config();
        config.database.url = "sqlite::memory:".to_string();
        let storage = Storage::open(&config, true).await.unwrap();
        assert!(storage.db.is_some());
        assert!(storage.repos.berths().find_all().await.unwrap().is_empty());
        storage.close().await;
    }
}
