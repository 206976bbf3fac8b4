//! # Device Error Types
//!
//! Failures of the scale device. These never leave the poller thread:
//! they are logged once and the poller exits quietly, leaving the rest of
//! the process untouched.

use thiserror::Error;

/// Scale device errors.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The serial port could not be opened.
    #[error("Failed to open scale port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Reading from the open port failed (not a timeout).
    #[error("Scale read failed: {0}")]
    Read(#[from] std::io::Error),
}

/// Result type for scale operations.
pub type DeviceResult<T> = Result<T, DeviceError>;
