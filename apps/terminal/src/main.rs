//! # Mercado POS Terminal
//!
//! Startup sequence:
//!
//! 1. Initialize tracing (`RUST_LOG` override, `info` default).
//! 2. Resolve settings (defaults → settings.json → `MERCADO_*` env).
//! 3. Open the database and run pending migrations.
//! 4. Spawn the scale poller; a missing scale degrades to "no reading".
//! 5. Run the screens until the operator quits.

mod error;
mod printer;
mod screens;
mod session;
mod settings;

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use error::AppResult;
use mercado_db::{Database, DbConfig};
use mercado_scale::{ScaleConfig, SharedWeight, WeightPoller};
use session::Session;
use settings::Settings;

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Terminal failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> AppResult<()> {
    let settings = Settings::load()?;
    info!(
        db = %settings.database_path.display(),
        scale = %settings.scale_port,
        "Starting Mercado POS terminal"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to start async runtime");

    let db = runtime.block_on(Database::new(DbConfig::new(&settings.database_path)))?;
    info!("Database connected and migrations applied");

    // The poller runs until process exit; its handle is intentionally
    // dropped. A connect failure is logged inside the thread and the
    // terminal keeps working without a weight signal.
    let weight = SharedWeight::new();
    let scale_config = ScaleConfig {
        baud_rate: settings.scale_baud,
        ..ScaleConfig::new(settings.scale_port.as_str())
    };
    WeightPoller::new(scale_config, weight.clone()).spawn();

    let printer = printer::from_device(settings.printer_device.as_deref());

    let mut session = Session::new(runtime, db, printer, weight, settings);
    screens::run(&mut session)?;

    info!("Terminal shut down");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
