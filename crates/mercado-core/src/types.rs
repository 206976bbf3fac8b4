//! # Domain Types
//!
//! Core domain types shared across the workspace.
//!
//! - [`Product`]: live inventory row; mutated by registration, edits and
//!   sale deductions.
//! - [`Sale`] / [`SaleItem`]: append-only record of a committed sale.
//!   Never mutated after checkout; `sum(items.subtotal) == sale.total`.
//!
//! Ids are SQLite rowids (`i64`), assigned on insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Invariant: `stock_quantity` never goes negative; the checkout path
/// re-validates against this field before every deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Row id, assigned by the database on registration.
    pub id: i64,

    /// Display name shown on buttons, listings and the receipt.
    pub name: String,

    /// Unit price in centavos.
    pub price_cents: i64,

    /// Units currently on record.
    pub stock_quantity: i64,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether any units are on record.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale.
///
/// Created only by the atomic checkout in mercado-db; append-only history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line of a committed sale.
///
/// `product_id` may reference a since-deleted product; the row is kept as
/// history either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub subtotal_cents: i64,
}

impl SaleItem {
    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
