//! # Receipt Printer Collaborator
//!
//! Emits the rendered receipt to the physical coupon printer. The layout
//! itself is pure (`mercado_core::receipt`); this module only moves the
//! finished text to a device.
//!
//! A print failure after checkout is always non-fatal: the sale is
//! already committed and the caller reports the failure as a warning.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use mercado_core::Receipt;

// =============================================================================
// Print Error
// =============================================================================

/// Receipt emission errors. Never fatal post-commit.
#[derive(Debug, Error)]
pub enum PrintError {
    /// The printer device could not be opened.
    #[error("Printer {path} unavailable: {source}")]
    DeviceUnavailable { path: PathBuf, source: io::Error },

    /// Writing the receipt bytes failed mid-coupon.
    #[error("Failed to write receipt: {0}")]
    Write(#[from] io::Error),
}

// =============================================================================
// ReceiptPrinter Trait
// =============================================================================

/// Anything that can put a finalized receipt in front of the customer.
pub trait ReceiptPrinter: Send {
    /// Emits the receipt. Errors surface as warnings, not failures.
    fn print(&self, receipt: &Receipt) -> Result<(), PrintError>;
}

/// Builds the printer selected by the settings: a device-backed printer
/// when a device path is configured, the console otherwise.
pub fn from_device(device: Option<&Path>) -> Box<dyn ReceiptPrinter> {
    match device {
        Some(path) => Box::new(DevicePrinter::new(path)),
        None => Box::new(ConsolePrinter),
    }
}

// =============================================================================
// Device Printer
// =============================================================================

/// Writes receipts to a printer device file (e.g. `/dev/usb/lp0`).
///
/// The device is opened per receipt; the terminal holds no handle to the
/// printer between sales.
#[derive(Debug)]
pub struct DevicePrinter {
    device_path: PathBuf,
}

impl DevicePrinter {
    /// Creates a printer for the given device path.
    pub fn new(device_path: impl Into<PathBuf>) -> Self {
        DevicePrinter {
            device_path: device_path.into(),
        }
    }
}

impl ReceiptPrinter for DevicePrinter {
    fn print(&self, receipt: &Receipt) -> Result<(), PrintError> {
        let mut device = OpenOptions::new()
            .write(true)
            .open(&self.device_path)
            .map_err(|source| PrintError::DeviceUnavailable {
                path: self.device_path.clone(),
                source,
            })?;

        device.write_all(receipt.render().as_bytes())?;
        // Blank run-out so the coupon clears the tear bar.
        device.write_all(b"\n\n\n")?;
        device.flush()?;

        info!(device = %self.device_path.display(), "Receipt printed");
        Ok(())
    }
}

// =============================================================================
// Console Printer
// =============================================================================

/// Prints receipts to stdout. Development default when no device is
/// configured.
#[derive(Debug)]
pub struct ConsolePrinter;

impl ReceiptPrinter for ConsolePrinter {
    fn print(&self, receipt: &Receipt) -> Result<(), PrintError> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(receipt.render().as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
