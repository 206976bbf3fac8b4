//! # Sale Repository
//!
//! The atomic checkout transaction plus sale history reads.
//!
//! ## Checkout Flow
//! ```text
//! checkout(cart lines)
//!   │
//!   ├─ BEGIN
//!   ├─ validation pass: re-read live stock for every line
//!   │    absent product      → ProductNotFound, rollback, nothing mutated
//!   │    stock < requested   → InsufficientStock, rollback, nothing mutated
//!   ├─ deduction pass: stock_quantity -= quantity per line
//!   ├─ INSERT sales row + one sale_items row per line
//!   └─ COMMIT → Sale
//! ```
//!
//! Stock is re-validated against the live rows, not the cart's snapshots:
//! time passes between adding an item and finalizing, and the cart's
//! earlier check may be stale. Receipt printing happens after commit, in
//! the caller; a print failure never rolls a committed sale back.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{CheckoutError, DbResult};
use mercado_core::{CartLine, Sale, SaleItem};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Converts the cart into a committed sale, all-or-nothing.
    ///
    /// Either every line's stock deduction is applied and the sale plus
    /// its items are persisted, or nothing is. On failure the error names
    /// the first failing product and the caller's cart is left untouched
    /// for the operator to adjust.
    pub async fn checkout(&self, lines: &[CartLine]) -> Result<Sale, CheckoutError> {
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        debug!(lines = lines.len(), "Starting checkout transaction");

        let mut tx = self.pool.begin().await?;

        // Validation pass. Any failure returns here, before a single
        // deduction; the transaction rolls back on drop.
        for line in lines {
            let row: Option<(String, i64)> =
                sqlx::query_as("SELECT name, stock_quantity FROM products WHERE id = ?1")
                    .bind(line.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let (name, stock) = row.ok_or(CheckoutError::ProductNotFound(line.product_id))?;

            if stock < line.quantity {
                return Err(CheckoutError::InsufficientStock {
                    name,
                    available: stock,
                    requested: line.quantity,
                });
            }
        }

        // Deduction pass.
        for line in lines {
            sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - ?2
                WHERE id = ?1
                "#,
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        let created_at = Utc::now();
        let total_cents: i64 = lines.iter().map(|l| l.subtotal_cents()).sum();

        let result = sqlx::query("INSERT INTO sales (created_at, total_cents) VALUES (?1, ?2)")
            .bind(created_at)
            .bind(total_cents)
            .execute(&mut *tx)
            .await?;
        let sale_id = result.last_insert_rowid();

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity, subtotal_cents)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.subtotal_cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(sale_id, total_cents, lines = lines.len(), "Sale committed");

        Ok(Sale {
            id: sale_id,
            created_at,
            total_cents,
        })
    }

    /// Gets a sale by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, created_at, total_cents FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all items of a sale, in insertion order.
    pub async fn get_items(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT sale_id, product_id, quantity, subtotal_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, created_at, total_cents
            FROM sales
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use mercado_core::Cart;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Registers a product and returns it as the cart code would see it.
    async fn seed_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> i64 {
        db.products()
            .register(name, price_cents, stock)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_checkout_commits_sale_and_decrements_stock() {
        let db = test_db().await;
        let arroz = seed_product(&db, "Arroz 5kg", 1050, 20).await;
        let feijao = seed_product(&db, "Feijão 1kg", 899, 10).await;

        let mut cart = Cart::new();
        let products = db.products();
        for _ in 0..2 {
            let p = products.get(arroz).await.unwrap().unwrap();
            cart.add_unit(&p).unwrap();
        }
        let p = products.get(feijao).await.unwrap().unwrap();
        cart.add_unit(&p).unwrap();

        let sale = db.sales().checkout(cart.lines()).await.unwrap();

        assert_eq!(sale.total_cents, 2 * 1050 + 899);

        // Each involved product decremented by exactly the requested quantity.
        assert_eq!(
            products.get(arroz).await.unwrap().unwrap().stock_quantity,
            18
        );
        assert_eq!(
            products.get(feijao).await.unwrap().unwrap().stock_quantity,
            9
        );

        // Sale total equals the sum of its item subtotals.
        let persisted = db.sales().get_by_id(sale.id).await.unwrap().unwrap();
        let items = db.sales().get_items(sale.id).await.unwrap();
        assert_eq!(items.len(), 2);
        let item_sum: i64 = items.iter().map(|i| i.subtotal_cents).sum();
        assert_eq!(persisted.total_cents, item_sum);
    }

    #[tokio::test]
    async fn test_checkout_aborts_whole_sale_on_insufficient_stock() {
        let db = test_db().await;
        let arroz = seed_product(&db, "Arroz 5kg", 1050, 20).await;
        let feijao = seed_product(&db, "Feijão 1kg", 899, 1).await;

        let mut cart = Cart::new();
        let products = db.products();
        let p = products.get(arroz).await.unwrap().unwrap();
        cart.add_unit(&p).unwrap();
        let p = products.get(feijao).await.unwrap().unwrap();
        cart.add_unit(&p).unwrap();

        // Stock changes under the cart between add and finalize.
        products.update(feijao, "Feijão 1kg", 899, 0).await.unwrap();

        let err = db.sales().checkout(cart.lines()).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock {
                available: 0,
                requested: 1,
                ..
            }
        ));

        // No stock mutated, no sale or sale_items created.
        assert_eq!(
            products.get(arroz).await.unwrap().unwrap().stock_quantity,
            20
        );
        assert_eq!(
            products.get(feijao).await.unwrap().unwrap().stock_quantity,
            0
        );
        assert!(db.sales().list_recent(10).await.unwrap().is_empty());

        // The cart is untouched for the operator to adjust.
        assert_eq!(cart.lines().len(), 2);
    }

    #[tokio::test]
    async fn test_checkout_names_missing_product() {
        let db = test_db().await;
        let arroz = seed_product(&db, "Arroz 5kg", 1050, 20).await;

        let mut cart = Cart::new();
        let p = db.products().get(arroz).await.unwrap().unwrap();
        cart.add_unit(&p).unwrap();

        // Product deleted between add and finalize.
        db.products().remove(arroz).await.unwrap();

        let err = db.sales().checkout(cart.lines()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::ProductNotFound(id) if id == arroz));
        assert!(db.sales().list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_cart() {
        let db = test_db().await;
        let err = db.sales().checkout(&[]).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_sold_out_product_can_sell_its_last_units() {
        let db = test_db().await;
        let id = seed_product(&db, "Sabão", 250, 2).await;

        let mut cart = Cart::new();
        for _ in 0..2 {
            let p = db.products().get(id).await.unwrap().unwrap();
            cart.add_unit(&p).unwrap();
        }

        db.sales().checkout(cart.lines()).await.unwrap();
        assert_eq!(db.products().get(id).await.unwrap().unwrap().stock_quantity, 0);
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let db = test_db().await;
        let id = seed_product(&db, "Leite 1L", 549, 10).await;

        for _ in 0..3 {
            let mut cart = Cart::new();
            let p = db.products().get(id).await.unwrap().unwrap();
            cart.add_unit(&p).unwrap();
            db.sales().checkout(cart.lines()).await.unwrap();
        }

        let sales = db.sales().list_recent(2).await.unwrap();
        assert_eq!(sales.len(), 2);
        assert!(sales[0].id > sales[1].id);
    }
}
