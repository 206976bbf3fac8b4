//! # Shared Weight Cell
//!
//! The one piece of state shared between the poller thread and the
//! interactive path. Writes are whole-value replacements behind a mutex;
//! readers get either the previous or the new sample, never a torn one.
//! There is no queue: only the most recent sample is kept, and stale
//! reads are acceptable.

use std::sync::{Arc, Mutex};

/// Latest known scale reading in grams, shared between threads.
///
/// `None` until the first valid sample arrives (or forever, if the scale
/// never connects).
#[derive(Debug, Clone, Default)]
pub struct SharedWeight {
    inner: Arc<Mutex<Option<f64>>>,
}

impl SharedWeight {
    /// Creates an empty cell.
    pub fn new() -> Self {
        SharedWeight::default()
    }

    /// Replaces the stored sample. Called only by the poller.
    pub fn publish(&self, grams: f64) {
        let mut cell = self.inner.lock().expect("Weight mutex poisoned");
        *cell = Some(grams);
    }

    /// Returns the latest sample without blocking on the poller.
    pub fn latest(&self) -> Option<f64> {
        *self.inner.lock().expect("Weight mutex poisoned")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        assert_eq!(SharedWeight::new().latest(), None);
    }

    #[test]
    fn test_publish_overwrites() {
        let weight = SharedWeight::new();
        weight.publish(45.2);
        assert_eq!(weight.latest(), Some(45.2));

        weight.publish(0.0);
        assert_eq!(weight.latest(), Some(0.0));
    }

    #[test]
    fn test_clones_share_the_cell() {
        let weight = SharedWeight::new();
        let reader = weight.clone();

        weight.publish(120.5);
        assert_eq!(reader.latest(), Some(120.5));
    }
}
