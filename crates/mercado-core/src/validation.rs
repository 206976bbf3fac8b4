//! # Validation Module
//!
//! Input validation for product registration and the terminal screens.
//!
//! Validation runs before any persistence is touched; a failure aborts
//! only the invoking action. The database adds its own layer (NOT NULL
//! and CHECK constraints), so invalid data is rejected twice.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product name.
const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name: non-empty after trimming, bounded length.
///
/// Returns the trimmed name.
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a price in centavos: zero is allowed, negative is not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock quantity: zero is allowed, negative is not.
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Input Parsers
// =============================================================================

/// Parses a user-typed price into centavos.
///
/// Accepts both decimal separators used at the register (`10,50` and
/// `10.50`), at most two decimal places. Parsing is integer-based; no
/// float rounding is involved.
///
/// ## Example
/// ```rust
/// use mercado_core::validation::parse_price_input;
///
/// assert_eq!(parse_price_input("10,50").unwrap(), 1050);
/// assert_eq!(parse_price_input("10.5").unwrap(), 1050);
/// assert_eq!(parse_price_input("3").unwrap(), 300);
/// assert!(parse_price_input("-1").is_err());
/// assert!(parse_price_input("abc").is_err());
/// ```
pub fn parse_price_input(input: &str) -> ValidationResult<i64> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: reason.to_string(),
    };

    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    if normalized.starts_with('-') {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    let (whole, frac) = match normalized.split_once('.') {
        Some((w, f)) => (w, f),
        None => (normalized.as_str(), ""),
    };

    let whole: i64 = match whole {
        // ".50" means zero whole units
        "" => 0,
        _ => whole
            .parse()
            .map_err(|_| invalid("must be a number like 10.50 or 10,50"))?,
    };

    let cents = match frac.len() {
        0 => 0,
        1 | 2 => {
            let digits: i64 = frac
                .parse()
                .map_err(|_| invalid("must be a number like 10.50 or 10,50"))?;
            if frac.len() == 1 {
                digits * 10
            } else {
                digits
            }
        }
        _ => return Err(invalid("at most two decimal places")),
    };

    Ok(whole * 100 + cents)
}

/// Parses a user-typed stock quantity into a non-negative integer.
pub fn parse_stock_input(input: &str) -> ValidationResult<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "stock".to_string(),
        });
    }

    let quantity: i64 = input.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "stock".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    validate_stock_quantity(quantity)?;
    Ok(quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name(" Arroz 5kg ").unwrap(), "Arroz 5kg");
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1050).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(20).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn test_parse_price_both_separators() {
        assert_eq!(parse_price_input("10.50").unwrap(), 1050);
        assert_eq!(parse_price_input("10,50").unwrap(), 1050);
        assert_eq!(parse_price_input(" 10,50 ").unwrap(), 1050);
    }

    #[test]
    fn test_parse_price_partial_decimals() {
        assert_eq!(parse_price_input("10").unwrap(), 1000);
        assert_eq!(parse_price_input("10.5").unwrap(), 1050);
        assert_eq!(parse_price_input("0.07").unwrap(), 7);
        assert_eq!(parse_price_input(".50").unwrap(), 50);
        assert_eq!(parse_price_input("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert!(parse_price_input("").is_err());
        assert!(parse_price_input("abc").is_err());
        assert!(parse_price_input("10.999").is_err());
        assert!(parse_price_input("10,5,0").is_err());
        assert!(parse_price_input("-10.50").is_err());
    }

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock_input("20").unwrap(), 20);
        assert_eq!(parse_stock_input(" 0 ").unwrap(), 0);
        assert!(parse_stock_input("").is_err());
        assert!(parse_stock_input("2.5").is_err());
        assert!(parse_stock_input("-3").is_err());
        assert!(parse_stock_input("vinte").is_err());
    }
}
