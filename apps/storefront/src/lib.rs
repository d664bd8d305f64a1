//! # DriveHub Storefront
//!
//! The `drivehub` command line: browse cars, book and pay, and run the
//! owner panel.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Startup                               │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                              │
//! │     └── --help / bad arguments exit here                                │
//! │                                                                         │
//! │  2. Initialize Tracing (Logging)                                        │
//! │     └── RUST_LOG or "info,drivehub=debug,sqlx=warn", to stderr          │
//! │                                                                         │
//! │  3. Determine Database Path                                             │
//! │     ├── DRIVEHUB_DB_PATH, or                                            │
//! │     └── platform data dir (~/.local/share/storefront/drivehub.db)       │
//! │                                                                         │
//! │  4. Open Database (runs migrations)                                     │
//! │                                                                         │
//! │  5. Load Client Config and Session                                      │
//! │     ├── client.toml + DRIVEHUB_* overrides                              │
//! │     └── session.json (signed out if missing)                            │
//! │                                                                         │
//! │  6. Run the command, print the result                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use drivehub_client::{
    BookingBackend, ClientConfig, HttpBackend, PaymentGateway, SessionStore, SimulatedGateway,
};
use drivehub_db::{Database, DbConfig};

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use state::{ConfigState, DbState, SessionState};

/// Everything a command may need, built once per run.
pub struct AppContext {
    pub db: DbState,
    pub config: ConfigState,
    pub client: ClientConfig,
    pub session: SessionState,
    pub backend: Arc<dyn BookingBackend>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub database_path: PathBuf,
}

impl AppContext {
    pub async fn build(database_path: PathBuf) -> anyhow::Result<Self> {
        let db = Database::new(DbConfig::new(&database_path))
            .await
            .with_context(|| format!("opening database at {}", database_path.display()))?;
        info!(path = %database_path.display(), "Database ready");

        let client = ClientConfig::load_or_default(None);
        let session = SessionState::load(SessionStore::from_config(&client)?)?;
        let backend = HttpBackend::from_config(&client)?;
        let gateway = SimulatedGateway::new(client.payment_mode());

        Ok(AppContext {
            db: DbState::new(db),
            config: ConfigState::from_env(),
            client,
            session,
            backend: Arc::new(backend),
            gateway: Arc::new(gateway),
            database_path,
        })
    }
}

/// Parses the command line, runs one command and prints its result.
///
/// Command failures are printed (as JSON with `--json`) and turned into a
/// failing exit code. Only startup failures come back as `Err`.
pub async fn run() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();

    init_tracing();

    let database_path = get_database_path()?;
    let mut ctx = AppContext::build(database_path).await?;

    let now = chrono::Utc::now();
    let today = chrono::Local::now().date_naive();

    let outcome = cli::dispatch(&mut ctx, cli.json, cli.command, today, now).await;
    ctx.db.inner().close().await;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&err)?);
            } else {
                eprintln!("error: {}", err.message);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug`: Show all debug messages
/// - `RUST_LOG=drivehub=trace`: Trace-level for DriveHub crates only
/// - Default: `info,drivehub=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,drivehub=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.drivehub.storefront/drivehub.db`
/// - **Windows**: `%APPDATA%\drivehub\storefront\data\drivehub.db`
/// - **Linux**: `~/.local/share/storefront/drivehub.db`
///
/// ## Development Override
/// Set `DRIVEHUB_DB_PATH` environment variable to use a custom path.
pub fn get_database_path() -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var("DRIVEHUB_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("com", "drivehub", "storefront")
        .context("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    Ok(data_dir.join("drivehub.db"))
}
