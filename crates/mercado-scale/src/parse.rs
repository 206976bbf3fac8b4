//! # Weight Line Parsing
//!
//! The scale firmware prints newline-delimited text; only lines with the
//! `Peso (g):` prefix carry a reading. Everything else on the wire (boot
//! banners, debug output, line noise) is discarded.

/// Prefix of a weight line as emitted by the scale firmware.
pub const WEIGHT_LINE_PREFIX: &str = "Peso (g):";

/// Extracts a weight in grams from one raw line.
///
/// Returns `None` for lines without the prefix or with a non-numeric
/// payload; negative readings (the load cell drifts under zero when
/// empty) clamp to `0.0`.
///
/// ## Example
/// ```rust
/// use mercado_scale::parse::parse_weight_line;
///
/// assert_eq!(parse_weight_line("Peso (g): 45.2"), Some(45.2));
/// assert_eq!(parse_weight_line("garbage"), None);
/// assert_eq!(parse_weight_line("Peso (g): -3"), Some(0.0));
/// ```
pub fn parse_weight_line(line: &str) -> Option<f64> {
    let payload = line.trim().strip_prefix(WEIGHT_LINE_PREFIX)?;
    let grams: f64 = payload.trim().parse().ok()?;
    Some(grams.max(0.0))
}

// =============================================================================
// Unit Tests
// =============================================================================
