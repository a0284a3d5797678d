//! # bookstore: Inventory and Sales Tracker
//!
//! The operator-facing binary: an interactive menu plus scriptable
//! subcommands over the same handlers.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          bookstore (CLI)                                │
//! │                                                                         │
//! │  main.rs ─────► run()                                                   │
//! │                   │                                                     │
//! │                   ├── args.rs ─────► clap: subcommand or menu          │
//! │                   ├── tracing ─────► stderr, EnvFilter                  │
//! │                   ├── config.rs ───► flags > env > .env > defaults      │
//! │                   └── AppContext ──► Database::new (migrations)         │
//! │                           │                                             │
//! │           ┌───────────────┴────────────────┐                            │
//! │           ▼                                ▼                            │
//! │   commands::dispatch              menu::run (stdin/stdout)              │
//! │           │                                │                            │
//! │           └──────────► commands::<entity> ◄┘                            │
//! │                               │                                         │
//! │                               ├── bookstore-db repositories             │
//! │                               └── export.rs (CSV)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (logging)
//! 3. Resolve configuration
//! 4. Open the database and run migrations
//! 5. Run the subcommand, or the menu when none was given

pub mod args;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod menu;

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};
use commands::AppContext;
use config::{AppConfig, ConfigOverrides};
use error::CliResult;

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "warn,bookstore=info,sqlx=warn";
const VERBOSE_LOG_FILTER: &str = "debug,sqlx=warn";

/// Runs the application and maps the outcome to a process exit code.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match execute(cli, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = out.flush();
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolves configuration, opens the database and runs one command.
pub async fn execute<W: Write>(cli: Cli, out: &mut W) -> CliResult<()> {
    let overrides = ConfigOverrides {
        db_path: cli.db,
        report_dir: cli.report_dir,
    };
    let config = AppConfig::load(&overrides)?;
    let ctx = AppContext::open(config).await?;

    info!("Starting bookstore");

    let command = cli.command.unwrap_or(Commands::Menu);
    let result = commands::dispatch(&ctx, command, out).await;

    ctx.db.close().await;
    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bookstore_db=trace` - Trace for the database crate only
/// - Default: warnings, plus info from the bookstore crates
/// - `--verbose`: debug
///
/// Logs go to stderr; stdout belongs to the menu and command output.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
