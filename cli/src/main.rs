//! Marina service CLI
//!
//! ```sh
//! # Run with default config (~/.config/marina-service/config.toml)
//! marina-service serve
//!
//! # Custom config path, throwaway in-memory store
//! marina-service --config ./marina.toml serve --memory
//!
//! # Validate config without starting
//! marina-service check
//!
//! # Load catways and reservations exported as JSON
//! marina-service seed --berths catways.json --reservations reservations.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use marina::application::booking::BerthLocks;
use marina::application::{BerthService, ReservationService};
use marina::config::AppConfig;
use marina::seed::{read_seed_file, BerthSeed, ReservationSeed, Seeder};
use marina::server::{init_tracing, ServerHandle, ServerOptions, Storage};

/// Marina berth reservation service.
#[derive(Parser, Debug)]
#[command(
    name = "marina-service",
    version,
    about = "Berth and reservation management for a marina",
    long_about = "REST API for a marina's berths (catways) and their reservations.\n\n\
                  Default config: ~/.config/marina-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "MARINA_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Override the database URL (`memory` for the in-memory store).
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the REST API server.
    Serve {
        /// Override the REST API listen port.
        #[arg(long)]
        api_port: Option<u16>,

        /// Use the in-memory store instead of the configured database.
        #[arg(long)]
        memory: bool,

        /// Skip database migrations on startup.
        #[arg(long)]
        no_migrate: bool,
    },
    /// Validate the configuration file and exit.
    Check,
    /// Insert berths and reservations from JSON arrays.
    Seed {
        #[arg(long)]
        berths: Option<PathBuf>,
        #[arg(long)]
        reservations: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(marina::default_config_path);
    let (mut config, load_error) = AppConfig::load_or_default(&config_path);

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    if let Some(url) = cli.database_url {
        info!("CLI override: database.url = {}", url);
        config.database.url = url;
    }

    match cli.command {
        Command::Check => {
            println!("✅ Configuration is valid");
            println!("   Config file   : {}", config_path.display());
            println!("   API address   : {}", config.server.address());
            println!("   Public URL    : {}", config.server.base_url());
            println!("   Database      : {}", config.database.url);
            println!("   Interval rule : {}", config.interval_rule());
            println!("   Log level     : {}", config.logging.level);
            Ok(())
        }
        Command::Seed {
            berths,
            reservations,
        } => {
            let berth_seeds: Vec<BerthSeed> = match berths {
                Some(path) => read_seed_file(&path)?,
                None => Vec::new(),
            };
            let reservation_seeds: Vec<ReservationSeed> = match reservations {
                Some(path) => read_seed_file(&path)?,
                None => Vec::new(),
            };

            let storage = Storage::open(&config, true).await?;
            let locks = std::sync::Arc::new(BerthLocks::new());
            let berth_service = BerthService::new(storage.repos.clone(), locks.clone());
            let reservation_service =
                ReservationService::new(storage.repos.clone(), locks, config.interval_rule());

            let report = Seeder::new(&berth_service, &reservation_service)
                .run(berth_seeds, reservation_seeds)
                .await?;
            storage.close().await;

            println!(
                "🌱 Berths: {} created, {} skipped",
                report.berths_created, report.berths_skipped
            );
            println!(
                "🌱 Reservations: {} created, {} skipped",
                report.reservations_created, report.reservations_skipped
            );
            Ok(())
        }
        Command::Serve {
            api_port,
            memory,
            no_migrate,
        } => {
            if let Some(port) = api_port {
                info!("CLI override: api_port = {}", port);
                config.server.api_port = port;
            }
            if memory {
                config.database.url = marina::config::MEMORY_DATABASE_URL.to_string();
            }

            let handle = ServerHandle::start(ServerOptions {
                config,
                auto_migrate: !no_migrate,
            })
            .await?;

            // Install OS signal handlers (SIGTERM, SIGINT)
            handle.install_signal_handler();
            info!("🚀 Press Ctrl+C to shutdown gracefully.");

            handle.wait().await;
            Ok(())
        }
    }
}
