//! # Storefront Library
//!
//! Catalog Query Engine and Cart Aggregator over a SQLite store, with a
//! command line front end.
//!
//! ## Module Organization
//! ```text
//! storefront/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── Environment configuration
//! ├── error.rs        ◄─── ApiError for service operations
//! ├── response.rs     ◄─── {"status": ...} JSON envelope
//! ├── cli.rs          ◄─── clap commands → service calls
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── cart_locks.rs ◄─ Per-cart write serialization
//! └── services/
//!     ├── mod.rs      ◄─── Storefront wiring
//!     ├── catalog.rs  ◄─── CatalogService
//!     └── cart.rs     ◄─── CartService
//! ```
//!
//! ## Output Streams
//! The JSON envelope is the only thing written to stdout. Logs go to stderr.

pub mod cli;
pub mod config;
pub mod error;
pub mod response;
pub mod services;
pub mod state;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::StorefrontConfig;
use response::Response;
use services::Storefront;
use storefront_db::Database;

/// Parses the command line, runs one command and prints its envelope.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Execution                                 │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, stderr                        │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • .env, then STOREFRONT_* variables                                 │
/// │     • --db overrides STOREFRONT_DATABASE_PATH                           │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Execute & Print ──────────────────────────────────────────────────► │
/// │     • success → exit 0                                                  │
/// │     • error envelope → exit 1                                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let mut config = match StorefrontConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = cli.db {
        config.database_path = path;
    }

    let db = match Database::new(config.db_config()).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, path = ?config.database_path, "Failed to open database");
            return ExitCode::FAILURE;
        }
    };

    info!(path = ?config.database_path, "Database connected and migrations applied");

    let storefront = Storefront::new(db.clone(), config.catalog_settings());

    let response = match cli::execute(cli.command, &storefront).await {
        Ok(response) => response,
        Err(e) => Response::from(e),
    };

    db.close().await;

    print(&response)
}

fn print(response: &Response) -> ExitCode {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = %e, "Failed to render response");
            return ExitCode::FAILURE;
        }
    }

    if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront=trace` - Show trace for storefront crates only
/// - Default: INFO level, sqlx at WARN
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
