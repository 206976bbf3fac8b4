//! # Weight Poller
//!
//! Background reader for the scale device. Runs on its own thread from
//! process start, independent of the screens and the sale path:
//!
//! 1. Opens the configured serial port. A connection failure is logged
//!    once and the poller exits; the rest of the process keeps running.
//! 2. Reads bytes on a fixed short interval, splitting them into
//!    newline-delimited lines.
//! 3. Publishes every line that parses as a weight into [`SharedWeight`];
//!    lines that don't parse are silently skipped.
//! 4. Runs until process exit. There is no cancellation.

use std::io::{self, Read};
use std::thread;
use std::time::Duration;

use tracing::{error, info, trace};

use crate::error::DeviceError;
use crate::parse::parse_weight_line;
use crate::reading::SharedWeight;

// =============================================================================
// Configuration
// =============================================================================

/// Scale device configuration.
#[derive(Debug, Clone)]
pub struct ScaleConfig {
    /// Serial port name (`/dev/ttyUSB0`, `COM3`, ...).
    pub port: String,

    /// Baud rate of the scale firmware.
    pub baud_rate: u32,

    /// Pause between reads; the scale emits a few samples per second.
    pub poll_interval: Duration,

    /// Serial read timeout. A timeout is not an error, just an empty poll.
    pub read_timeout: Duration,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        ScaleConfig {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
            poll_interval: Duration::from_millis(100),
            read_timeout: Duration::from_secs(1),
        }
    }
}

impl ScaleConfig {
    /// Creates a configuration for the given port with default timing.
    pub fn new(port: impl Into<String>) -> Self {
        ScaleConfig {
            port: port.into(),
            ..ScaleConfig::default()
        }
    }
}

// =============================================================================
// Weight Poller
// =============================================================================

/// Background poller publishing scale samples into a [`SharedWeight`].
#[derive(Debug)]
pub struct WeightPoller {
    config: ScaleConfig,
    weight: SharedWeight,
}

impl WeightPoller {
    /// Creates a poller that will publish into `weight`.
    pub fn new(config: ScaleConfig, weight: SharedWeight) -> Self {
        WeightPoller { config, weight }
    }

    /// Spawns the poller on a dedicated thread and returns its handle.
    ///
    /// The thread lives until process exit (or until the device fails);
    /// callers normally drop the handle.
    pub fn spawn(self) -> thread::JoinHandle<()> {
        thread::Builder::new()
            .name("scale-poller".to_string())
            .spawn(move || self.run())
            .expect("Failed to spawn scale poller thread")
    }

    /// Opens the port and pumps readings until the device goes away.
    fn run(self) {
        let port = serialport::new(&self.config.port, self.config.baud_rate)
            .timeout(self.config.read_timeout)
            .open();

        match port {
            Ok(port) => {
                info!(port = %self.config.port, baud = self.config.baud_rate, "Scale connected");
                self.read_loop(port);
            }
            Err(source) => {
                // Reported once; the interactive path simply never sees
                // a weight.
                let err = DeviceError::Open {
                    port: self.config.port.clone(),
                    source,
                };
                error!(%err, "Scale unavailable, poller exiting");
            }
        }
    }

    /// Reads newline-delimited lines from `reader` and publishes every
    /// one that parses as a weight.
    ///
    /// Generic over the reader so tests can drive it with a byte buffer.
    fn read_loop(&self, mut reader: impl Read) {
        let mut pending: Vec<u8> = Vec::new();
        let mut buf = [0u8; 256];

        loop {
            match reader.read(&mut buf) {
                // EOF: device went away.
                Ok(0) => {
                    info!("Scale stream ended, poller exiting");
                    return;
                }
                Ok(n) => {
                    pending.extend_from_slice(&buf[..n]);
                    self.drain_lines(&mut pending);
                }
                // Quiet poll; the scale had nothing to say.
                Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {}
                Err(e) => {
                    let err = DeviceError::Read(e);
                    error!(%err, "Scale read failed, poller exiting");
                    return;
                }
            }

            thread::sleep(self.config.poll_interval);
        }
    }

    /// Parses and publishes every complete line buffered so far; a
    /// trailing partial line stays pending until its newline arrives.
    fn drain_lines(&self, pending: &mut Vec<u8>) {
        while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);

            if let Some(grams) = parse_weight_line(&line) {
                trace!(grams, "Weight sample");
                self.weight.publish(grams);
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
