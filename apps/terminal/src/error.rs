//! # Terminal Error Type
//!
//! One error type for the screens, collecting the workspace's error
//! families. Screens render `AppError` messages and abort only the
//! action that raised them.

use thiserror::Error;

use crate::printer::PrintError;
use crate::settings::SettingsError;
use mercado_core::{CoreError, ValidationError};
use mercado_db::{CheckoutError, DbError};

/// Errors surfaced to the terminal screens.
#[derive(Debug, Error)]
pub enum AppError {
    /// Business rule violation (insufficient stock on add, empty cart...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Bad user input; nothing was persisted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage failure.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The sale transaction aborted; no partial effect was persisted.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Startup configuration failure.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Print failure, reported on its own because it never implies a
    /// failed sale.
    #[error("Receipt printing failed: {0}")]
    Print(#[from] PrintError),

    /// Terminal input/output failure.
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for terminal operations.
pub type AppResult<T> = Result<T, AppError>;
