//! # Receipt Layout
//!
//! Pure text layout of a finalized sale, 30 columns wide to fit the store's
//! coupon printer. Byte-level printer protocol framing (ESC/POS commands,
//! cut, code pages) is the printer driver's concern, not this module's.

use chrono::{DateTime, Local};

use crate::cart::CartLine;
use crate::money::Money;

/// Width of the coupon paper, in characters.
const PAPER_WIDTH: usize = 30;

/// Item names longer than this are truncated with `..` on the coupon.
const MAX_ITEM_NAME: usize = 17;

// =============================================================================
// Receipt
// =============================================================================

/// A finalized sale, laid out for printing.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// Store name, centered in the header.
    pub store_name: String,

    /// Store address line.
    pub store_address: String,

    /// Local time the sale was finalized.
    pub issued_at: DateTime<Local>,

    /// One line per cart line, in cart order.
    pub lines: Vec<ReceiptLine>,

    /// Sale total in centavos; equals the sum of the line subtotals.
    pub total_cents: i64,
}

/// One item line on the receipt.
#[derive(Debug, Clone)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl ReceiptLine {
    /// Line subtotal in centavos.
    #[inline]
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

impl Receipt {
    /// Builds a receipt from the finalized cart lines.
    pub fn from_cart_lines(
        store_name: impl Into<String>,
        store_address: impl Into<String>,
        issued_at: DateTime<Local>,
        cart_lines: &[CartLine],
    ) -> Self {
        let lines: Vec<ReceiptLine> = cart_lines
            .iter()
            .map(|l| ReceiptLine {
                name: l.name.clone(),
                quantity: l.quantity,
                unit_price_cents: l.unit_price_cents,
            })
            .collect();
        let total_cents = lines.iter().map(|l| l.subtotal_cents()).sum();

        Receipt {
            store_name: store_name.into(),
            store_address: store_address.into(),
            issued_at,
            lines,
            total_cents,
        }
    }

    /// Renders the receipt as plain text.
    ///
    /// Layout (matching the store's coupon):
    ///
    /// ```text
    ///      MERCADO PAI E FILHO
    /// Rua Santa Luzia, 09
    /// 07/08/2026 14:03:21
    /// ------------------------------
    /// Itens:
    /// Arroz 5kg           2 x  10.50 =   21.00
    /// ------------------------------
    /// TOTAL: R$ 21.00
    ///
    /// Obrigado pela sua compra!
    /// Volte sempre!
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("{:^width$}\n", self.store_name, width = PAPER_WIDTH));
        out.push_str(&self.store_address);
        out.push('\n');
        out.push_str(&self.issued_at.format("%d/%m/%Y %H:%M:%S").to_string());
        out.push('\n');
        out.push_str(&"-".repeat(PAPER_WIDTH));
        out.push('\n');
        out.push_str("Itens:\n");

        for line in &self.lines {
            out.push_str(&format!(
                "{:<width$} {:>3} x {:>6} = {:>7}\n",
                truncate_name(&line.name),
                line.quantity,
                Money::from_cents(line.unit_price_cents).to_decimal_string(),
                Money::from_cents(line.subtotal_cents()).to_decimal_string(),
                width = MAX_ITEM_NAME,
            ));
        }

        out.push_str(&"-".repeat(PAPER_WIDTH));
        out.push('\n');
        out.push_str(&format!("TOTAL: {}\n", Money::from_cents(self.total_cents)));
        out.push_str("\nObrigado pela sua compra!\nVolte sempre!\n");

        out
    }
}

/// Truncates an item name to the coupon column width, marking the cut
/// with `..`.
fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_ITEM_NAME {
        let head: String = name.chars().take(MAX_ITEM_NAME - 2).collect();
        format!("{}..", head)
    } else {
        name.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
