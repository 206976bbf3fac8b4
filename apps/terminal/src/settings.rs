//! # Terminal Settings
//!
//! Configuration for the POS terminal, resolved in three layers:
//! defaults, an optional `settings.json` next to the database, and
//! `MERCADO_*` environment variables (highest precedence).
//!
//! ## Environment Variables
//! - `MERCADO_DB_PATH` - database file (default: platform data dir)
//! - `MERCADO_SCALE_PORT` - scale serial port (default `/dev/ttyUSB0`)
//! - `MERCADO_SCALE_BAUD` - scale baud rate (default 115200)
//! - `MERCADO_PRINTER_DEVICE` - printer device path (unset: console)
//! - `MERCADO_STORE_NAME` / `MERCADO_STORE_ADDRESS` - receipt header
//! - `MERCADO_LOW_WEIGHT_GRAMS` - low-stock warning threshold (default 100)

use std::env;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Grams below which the scale warning fires.
const DEFAULT_LOW_WEIGHT_GRAMS: f64 = 100.0;

// =============================================================================
// Settings
// =============================================================================

/// Resolved terminal configuration. Read-only after startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Serial port of the scale device.
    pub scale_port: String,

    /// Baud rate of the scale firmware.
    pub scale_baud: u32,

    /// Receipt printer device path; `None` prints to the console.
    pub printer_device: Option<PathBuf>,

    /// Store name, printed on the receipt header.
    pub store_name: String,

    /// Store address line, printed on the receipt header.
    pub store_address: String,

    /// Scale reading below this many grams triggers the low-stock warning.
    pub low_weight_grams: f64,
}

/// Optional on-disk overlay (`settings.json` in the data directory).
/// Absent fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
struct SettingsFile {
    scale_port: Option<String>,
    scale_baud: Option<u32>,
    printer_device: Option<PathBuf>,
    store_name: Option<String>,
    store_address: Option<String>,
    low_weight_grams: Option<f64>,
}

impl Settings {
    /// Loads settings: defaults, then `settings.json`, then environment.
    pub fn load() -> Result<Self, SettingsError> {
        let data_dir = resolve_data_dir()?;

        let mut settings = Settings {
            database_path: data_dir.join("mercado.db"),
            scale_port: "/dev/ttyUSB0".to_string(),
            scale_baud: 115_200,
            printer_device: None,
            store_name: "Mercado Pai e Filho".to_string(),
            store_address: "Rua Santa Luzia, 09".to_string(),
            low_weight_grams: DEFAULT_LOW_WEIGHT_GRAMS,
        };

        settings.apply_file(data_dir.join("settings.json"))?;
        settings.apply_env()?;

        debug!(?settings, "Settings resolved");
        Ok(settings)
    }

    /// Overlays values from `settings.json`, when present.
    fn apply_file(&mut self, path: PathBuf) -> Result<(), SettingsError> {
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => return Err(SettingsError::ReadFile { path, source }),
        };

        let file: SettingsFile = serde_json::from_str(&contents)
            .map_err(|source| SettingsError::ParseFile { path, source })?;

        if let Some(port) = file.scale_port {
            self.scale_port = port;
        }
        if let Some(baud) = file.scale_baud {
            self.scale_baud = baud;
        }
        if let Some(device) = file.printer_device {
            self.printer_device = Some(device);
        }
        if let Some(name) = file.store_name {
            self.store_name = name;
        }
        if let Some(address) = file.store_address {
            self.store_address = address;
        }
        if let Some(grams) = file.low_weight_grams {
            self.low_weight_grams = grams;
        }

        Ok(())
    }

    /// Applies `MERCADO_*` environment overrides.
    fn apply_env(&mut self) -> Result<(), SettingsError> {
        if let Ok(path) = env::var("MERCADO_DB_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Ok(port) = env::var("MERCADO_SCALE_PORT") {
            self.scale_port = port;
        }
        if let Ok(baud) = env::var("MERCADO_SCALE_BAUD") {
            self.scale_baud = baud
                .parse()
                .map_err(|_| SettingsError::InvalidValue("MERCADO_SCALE_BAUD".to_string()))?;
        }
        if let Ok(device) = env::var("MERCADO_PRINTER_DEVICE") {
            self.printer_device = Some(PathBuf::from(device));
        }
        if let Ok(name) = env::var("MERCADO_STORE_NAME") {
            self.store_name = name;
        }
        if let Ok(address) = env::var("MERCADO_STORE_ADDRESS") {
            self.store_address = address;
        }
        if let Ok(grams) = env::var("MERCADO_LOW_WEIGHT_GRAMS") {
            self.low_weight_grams = grams
                .parse()
                .map_err(|_| SettingsError::InvalidValue("MERCADO_LOW_WEIGHT_GRAMS".to_string()))?;
        }

        Ok(())
    }
}

/// Resolves (and creates) the platform data directory.
///
/// `MERCADO_DB_PATH` bypasses this entirely; it is only consulted for the
/// default database and settings-file location.
fn resolve_data_dir() -> Result<PathBuf, SettingsError> {
    let proj_dirs = ProjectDirs::from("br", "mercado", "pos").ok_or(SettingsError::NoDataDir)?;
    let data_dir = proj_dirs.data_dir().to_path_buf();

    std::fs::create_dir_all(&data_dir).map_err(|source| SettingsError::CreateDataDir {
        path: data_dir.clone(),
        source,
    })?;

    Ok(data_dir)
}

// =============================================================================
// Settings Error
// =============================================================================

/// Configuration errors; all fatal at startup.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not determine a data directory for the database")]
    NoDataDir,

    #[error("Failed to create data directory {path}: {source}")]
    CreateDataDir { path: PathBuf, source: io::Error },

    #[error("Failed to read settings file {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("Invalid settings file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
