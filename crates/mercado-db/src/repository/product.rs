//! # Product Repository
//!
//! Database operations for the inventory: registration, full-overwrite
//! edits, deletion and the name-ordered listing the screens render.
//!
//! Every mutation executes a single statement on a pooled connection and
//! is durable when the call returns; there is no batching. Stock
//! deductions do not live here: they belong to the checkout transaction
//! in [`crate::repository::sale::SaleRepository`].

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mercado_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let id = repo.register("Arroz 5kg", 1050, 20).await?;
/// let all = repo.list_all().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product and returns its assigned id.
    ///
    /// Inputs are validated by `mercado_core::validation` before they
    /// reach this call; the schema's CHECK constraints back that up.
    pub async fn register(
        &self,
        name: &str,
        price_cents: i64,
        stock_quantity: i64,
    ) -> DbResult<i64> {
        debug!(name = %name, price_cents, stock_quantity, "Registering product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, stock_quantity)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(price_cents)
        .bind(stock_quantity)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites all fields of an existing product. No partial update.
    ///
    /// Returns `DbError::NotFound` when the id is absent.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        price_cents: i64,
        stock_quantity: i64,
    ) -> DbResult<()> {
        debug!(id, name = %name, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, price_cents = ?3, stock_quantity = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(price_cents)
        .bind(stock_quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Historical sale_items keep their product_id; sales are append-only
    /// history and are not cascade-fixed.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        debug!(id, "Removing product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Lists every product, ordered by name ascending.
    ///
    /// The query is re-issued on every call, so each listing reflects the
    /// stock at that moment.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock_quantity
            FROM products
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock_quantity
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Counts registered products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
