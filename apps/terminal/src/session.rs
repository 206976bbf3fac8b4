//! # Session
//!
//! The operations layer between the screens and the rest of the
//! workspace. Every button the screens offer maps to one method here:
//! the screens never see SQL, the repositories never see stdin.
//!
//! The interactive path is single-threaded and cooperative: each
//! operation runs to completion (driving the async database layer with
//! `block_on`) before the next user action is processed, so the cart
//! needs no locking. The only state shared with another thread is the
//! scale's [`SharedWeight`] cell, which is read-only here.

use chrono::Local;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::printer::{PrintError, ReceiptPrinter};
use crate::settings::Settings;
use mercado_core::{validation, Cart, CoreError, Product, Receipt, RemoveOutcome, Sale};
use mercado_db::{Database, DbError};
use mercado_scale::SharedWeight;

// =============================================================================
// Finalize Outcome
// =============================================================================

/// Result of a finalized sale.
///
/// `print_warning` carries a receipt failure separately from the sale:
/// by the time printing runs, the sale is committed and stays committed.
#[derive(Debug)]
pub struct FinalizeOutcome {
    pub sale: Sale,
    pub receipt: Receipt,
    pub print_warning: Option<PrintError>,
}

// =============================================================================
// Session
// =============================================================================

/// One terminal session: database handle, current cart, printer and the
/// scale reading.
pub struct Session {
    runtime: Runtime,
    db: Database,
    cart: Cart,
    printer: Box<dyn ReceiptPrinter>,
    weight: SharedWeight,
    settings: Settings,
}

impl Session {
    /// Creates a session over an initialized database.
    pub fn new(
        runtime: Runtime,
        db: Database,
        printer: Box<dyn ReceiptPrinter>,
        weight: SharedWeight,
        settings: Settings,
    ) -> Self {
        Session {
            runtime,
            db,
            cart: Cart::new(),
            printer,
            weight,
            settings,
        }
    }

    /// The resolved settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // =========================================================================
    // Inventory Operations
    // =========================================================================

    /// Registers a product from the raw register inputs and returns its
    /// assigned id.
    ///
    /// Accepts prices typed with either decimal separator (`10,50` or
    /// `10.50`). Validation failures abort before anything is persisted.
    pub fn register_product(
        &self,
        name: &str,
        price_input: &str,
        stock_input: &str,
    ) -> AppResult<i64> {
        let name = validation::validate_product_name(name)?;
        let price_cents = validation::parse_price_input(price_input)?;
        let stock = validation::parse_stock_input(stock_input)?;

        let id = self
            .runtime
            .block_on(self.db.products().register(&name, price_cents, stock))?;

        info!(id, name = %name, "Product registered");
        Ok(id)
    }

    /// Overwrites all fields of an existing product.
    pub fn update_product(
        &self,
        id: i64,
        name: &str,
        price_input: &str,
        stock_input: &str,
    ) -> AppResult<()> {
        let name = validation::validate_product_name(name)?;
        let price_cents = validation::parse_price_input(price_input)?;
        let stock = validation::parse_stock_input(stock_input)?;

        self.runtime
            .block_on(self.db.products().update(id, &name, price_cents, stock))?;

        info!(id, name = %name, "Product updated");
        Ok(())
    }

    /// Deletes a product. Historical sales keep referencing its id.
    pub fn delete_product(&self, id: i64) -> AppResult<()> {
        self.runtime.block_on(self.db.products().remove(id))?;
        info!(id, "Product deleted");
        Ok(())
    }

    /// Lists every product, ordered by name.
    pub fn list_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.runtime.block_on(self.db.products().list_all())?)
    }

    /// Gets one product, failing with NotFound when absent.
    pub fn get_product(&self, id: i64) -> AppResult<Product> {
        self.runtime
            .block_on(self.db.products().get(id))?
            .ok_or_else(|| AppError::Db(DbError::not_found("Product", id)))
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Adds one unit of a product to the cart, checking the live stock.
    pub fn add_to_cart(&mut self, product_id: i64) -> AppResult<()> {
        let products = self.db.products();
        let product = self
            .runtime
            .block_on(products.get(product_id))?
            .ok_or_else(|| AppError::Db(DbError::not_found("Product", product_id)))?;

        self.cart.add_unit(&product)?;
        Ok(())
    }

    /// Removes one unit from the cart.
    ///
    /// Removing a product that is not in the cart is a warning, not an
    /// error.
    pub fn remove_from_cart(&mut self, product_id: i64) -> RemoveOutcome {
        let outcome = self.cart.remove_unit(product_id);
        if outcome == RemoveOutcome::NotInCart {
            warn!(product_id, "Remove requested for product not in cart");
        }
        outcome
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    // =========================================================================
    // Sale Transaction
    // =========================================================================

    /// Converts the cart into a committed sale.
    ///
    /// Stock is re-validated against the live rows inside one atomic
    /// transaction; on any failure nothing is deducted and the cart is
    /// left untouched for the operator to adjust. After commit the
    /// receipt is emitted; a print failure is returned as a warning and
    /// the cart is cleared regardless.
    pub fn finalize_sale(&mut self) -> AppResult<FinalizeOutcome> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let lines = self.cart.lines().to_vec();
        let sale = self.runtime.block_on(self.db.sales().checkout(&lines))?;

        let receipt = Receipt::from_cart_lines(
            self.settings.store_name.clone(),
            self.settings.store_address.clone(),
            Local::now(),
            &lines,
        );

        let print_warning = match self.printer.print(&receipt) {
            Ok(()) => None,
            Err(e) => {
                warn!(sale_id = sale.id, error = %e, "Receipt printing failed; sale is committed");
                Some(e)
            }
        };

        self.cart.clear();
        info!(sale_id = sale.id, total = %sale.total(), "Sale finalized");

        Ok(FinalizeOutcome {
            sale,
            receipt,
            print_warning,
        })
    }

    /// Lists the most recent sales, newest first.
    pub fn recent_sales(&self, limit: i64) -> AppResult<Vec<Sale>> {
        Ok(self.runtime.block_on(self.db.sales().list_recent(limit))?)
    }

    // =========================================================================
    // Scale Reading
    // =========================================================================

    /// Returns the scale weight when it is below the low-stock threshold.
    ///
    /// `None` means either "no warning" or "scale never reported"; the
    /// screens render nothing in both cases.
    pub fn low_weight(&self) -> Option<f64> {
        self.weight
            .latest()
            .filter(|grams| *grams < self.settings.low_weight_grams)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use mercado_db::{CheckoutError, DbConfig};

    /// Printer that records rendered receipts instead of emitting them.
    struct RecordingPrinter {
        printed: Arc<Mutex<Vec<String>>>,
    }

    /// Printer whose device is always offline.
    struct FailingPrinter;

    impl ReceiptPrinter for RecordingPrinter {
        fn print(&self, receipt: &Receipt) -> Result<(), PrintError> {
            self.printed.lock().unwrap().push(receipt.render());
            Ok(())
        }
    }

    impl ReceiptPrinter for FailingPrinter {
        fn print(&self, _receipt: &Receipt) -> Result<(), PrintError> {
            Err(PrintError::DeviceUnavailable {
                path: PathBuf::from("/dev/usb/lp0"),
                source: io::Error::new(io::ErrorKind::NotFound, "printer offline"),
            })
        }
    }

    fn test_settings() -> Settings {
        Settings {
            database_path: PathBuf::from(":memory:"),
            scale_port: "/dev/ttyUSB0".to_string(),
            scale_baud: 115_200,
            printer_device: None,
            store_name: "Mercado Pai e Filho".to_string(),
            store_address: "Rua Santa Luzia, 09".to_string(),
            low_weight_grams: 100.0,
        }
    }

    fn test_session(printer: Box<dyn ReceiptPrinter>) -> Session {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let db = runtime
            .block_on(Database::new(DbConfig::in_memory()))
            .unwrap();
        Session::new(runtime, db, printer, SharedWeight::new(), test_settings())
    }

    fn recording_session() -> (Session, Arc<Mutex<Vec<String>>>) {
        let printed = Arc::new(Mutex::new(Vec::new()));
        let printer = RecordingPrinter {
            printed: printed.clone(),
        };
        (test_session(Box::new(printer)), printed)
    }

    #[test]
    fn test_register_accepts_comma_decimal_price() {
        let (session, _) = recording_session();

        let id = session.register_product("Rice", "10,50", "20").unwrap();

        let products = session.list_products().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, id);
        assert_eq!(products[0].name, "Rice");
        assert_eq!(products[0].price_cents, 1050);
        assert_eq!(products[0].stock_quantity, 20);
    }

    #[test]
    fn test_register_rejects_bad_input_before_persisting() {
        let (session, _) = recording_session();

        assert!(matches!(
            session.register_product("", "10.50", "20"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            session.register_product("Rice", "dez", "20"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            session.register_product("Rice", "10.50", "-1"),
            Err(AppError::Validation(_))
        ));

        assert!(session.list_products().unwrap().is_empty());
    }

    #[test]
    fn test_add_to_cart_checks_live_stock() {
        let (mut session, _) = recording_session();
        let id = session.register_product("Arroz 5kg", "10.50", "1").unwrap();

        session.add_to_cart(id).unwrap();

        // Stock (1) already fully in the cart: next add must fail and
        // leave the cart untouched.
        let err = session.add_to_cart(id).unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::InsufficientStock { .. })
        ));
        assert_eq!(session.cart().quantity_of(id), 1);
    }

    #[test]
    fn test_add_unknown_product_is_not_found() {
        let (mut session, _) = recording_session();
        assert!(matches!(
            session.add_to_cart(99),
            Err(AppError::Db(DbError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_remove_not_in_cart_is_warning_noop() {
        let (mut session, _) = recording_session();
        assert_eq!(session.remove_from_cart(7), RemoveOutcome::NotInCart);
    }

    #[test]
    fn test_finalize_commits_prints_and_clears() {
        let (mut session, printed) = recording_session();
        let id = session.register_product("Arroz 5kg", "10.50", "20").unwrap();

        session.add_to_cart(id).unwrap();
        session.add_to_cart(id).unwrap();

        let outcome = session.finalize_sale().unwrap();

        assert!(outcome.print_warning.is_none());
        assert_eq!(outcome.sale.total_cents, 2100);
        assert_eq!(session.get_product(id).unwrap().stock_quantity, 18);
        assert!(session.cart().is_empty());

        let printed = printed.lock().unwrap();
        assert_eq!(printed.len(), 1);
        assert!(printed[0].contains("TOTAL: R$ 21.00"));
    }

    #[test]
    fn test_finalize_with_failed_printer_keeps_sale_and_clears_cart() {
        let mut session = test_session(Box::new(FailingPrinter));
        let id = session.register_product("Arroz 5kg", "10.50", "20").unwrap();
        session.add_to_cart(id).unwrap();

        let outcome = session.finalize_sale().unwrap();

        // The print failure is a warning: stock deducted, sale persisted,
        // cart cleared anyway.
        assert!(matches!(
            outcome.print_warning,
            Some(PrintError::DeviceUnavailable { .. })
        ));
        assert_eq!(session.get_product(id).unwrap().stock_quantity, 19);
        let sales = session.recent_sales(10).unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, outcome.sale.id);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_finalize_aborts_on_stale_cart_without_clearing_it() {
        let (mut session, printed) = recording_session();
        let id = session.register_product("Feijão 1kg", "8.99", "2").unwrap();
        session.add_to_cart(id).unwrap();
        session.add_to_cart(id).unwrap();

        // Stock shrinks behind the cart's back.
        session.update_product(id, "Feijão 1kg", "8.99", "1").unwrap();

        let err = session.finalize_sale().unwrap_err();
        assert!(matches!(
            err,
            AppError::Checkout(CheckoutError::InsufficientStock { .. })
        ));

        // Nothing deducted, nothing printed, cart kept for adjustment.
        assert_eq!(session.get_product(id).unwrap().stock_quantity, 1);
        assert!(printed.lock().unwrap().is_empty());
        assert_eq!(session.cart().quantity_of(id), 2);
    }

    #[test]
    fn test_finalize_rejects_empty_cart() {
        let (mut session, _) = recording_session();
        assert!(matches!(
            session.finalize_sale(),
            Err(AppError::Core(CoreError::EmptyCart))
        ));
    }

    #[test]
    fn test_low_weight_threshold() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let db = runtime
            .block_on(Database::new(DbConfig::in_memory()))
            .unwrap();
        let weight = SharedWeight::new();
        let session = Session::new(
            runtime,
            db,
            Box::new(FailingPrinter),
            weight.clone(),
            test_settings(),
        );

        assert_eq!(session.low_weight(), None);

        weight.publish(45.2);
        assert_eq!(session.low_weight(), Some(45.2));

        weight.publish(250.0);
        assert_eq!(session.low_weight(), None);
    }
}
