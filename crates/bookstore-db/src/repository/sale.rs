//! # Sale Repository
//!
//! Records and reverses sales. This is the only place stock and sales
//! change together.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  record_sale(book, customer, qty)                                      │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   SINGLE TRANSACTION                            │   │
//! │  │  1. book exists?            else NotFound                       │   │
//! │  │  2. customer exists?        else NotFound                       │   │
//! │  │  3. qty >= 1?               else Validation                     │   │
//! │  │  4. stock >= qty?           else InsufficientStock              │   │
//! │  │  5. UPDATE books SET stock = stock - qty                        │   │
//! │  │        WHERE id = ? AND stock >= qty   (0 rows → rollback)      │   │
//! │  │  6. INSERT INTO sales (..., date = now)                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │  COMMIT ← both succeed or both fail                            │
//! │       ▼                                                                 │
//! │  delete_sale(id)                                                       │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   SINGLE TRANSACTION                            │   │
//! │  │  1. sale exists?            else NotFound                       │   │
//! │  │  2. UPDATE books SET stock = stock + sale.qty                   │   │
//! │  │  3. DELETE FROM sales WHERE id = ?                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step 5 is a compare-and-decrement, so two callers sharing the pool can't
//! both sell the last copy even though step 4 already looked at the stock.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use bookstore_core::validation::validate_quantity;
use bookstore_core::{Book, Sale};

const SALE_COLUMNS: &str = "id, book_id, customer_id, quantity, date";

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

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists all sales in the order they were recorded.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the sales made to one customer.
    pub async fn list_by_customer(&self, customer_id: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE customer_id = ?1 ORDER BY id"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the sales of one book.
    pub async fn list_by_book(&self, book_id: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE book_id = ?1 ORDER BY id"
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Sells `quantity` copies of a book to a customer.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - The committed sale; the book's stock is already reduced
    /// * `Err(DbError::NotFound)` - Book or customer doesn't exist
    /// * `Err(DbError::Validation)` - Quantity below 1 or above the maximum
    /// * `Err(DbError::InsufficientStock)` - Not enough copies; nothing written
    pub async fn record_sale(&self, book_id: i64, customer_id: i64, quantity: i64) -> DbResult<Sale> {
        debug!(book_id, customer_id, quantity, "Recording sale");

        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, price_cents, stock, author_id FROM books WHERE id = ?1",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Book", book_id))?;

        let customer_found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = ?1")
            .bind(customer_id)
            .fetch_one(&mut *tx)
            .await?;

        if customer_found == 0 {
            return Err(DbError::not_found("Customer", customer_id));
        }

        validate_quantity(quantity)?;
        book.check_can_sell(quantity)?;

        let decremented = sqlx::query(
            "UPDATE books SET stock = stock - ?2 WHERE id = ?1 AND stock >= ?2",
        )
        .bind(book_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            // Stock moved between the read and the write
            return Err(DbError::InsufficientStock {
                book_id,
                title: book.title,
                available: book.stock,
                requested: quantity,
            });
        }

        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            INSERT INTO sales (book_id, customer_id, quantity, date)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(book_id)
        .bind(customer_id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id = sale.id,
            book_id,
            customer_id,
            quantity,
            stock_left = book.stock - quantity,
            "Sale recorded"
        );

        Ok(sale)
    }

    /// Deletes a sale and puts its copies back on the shelf.
    ///
    /// If the book row is gone the restock is skipped; with delete blocking
    /// on books that have sales this only happens to rows edited outside
    /// the application.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - The sale that was removed
    /// * `Err(DbError::NotFound)` - Sale doesn't exist
    pub async fn delete_sale(&self, sale_id: i64) -> DbResult<Sale> {
        debug!(sale_id, "Deleting sale");

        let mut tx = self.pool.begin().await?;

        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(sale_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", sale_id))?;

        let restocked = sqlx::query("UPDATE books SET stock = stock + ?2 WHERE id = ?1")
            .bind(sale.book_id)
            .bind(sale.quantity)
            .execute(&mut *tx)
            .await?;

        if restocked.rows_affected() == 0 {
            warn!(
                sale_id,
                book_id = sale.book_id,
                "Book no longer exists, skipping stock restore"
            );
        }

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id,
            book_id = sale.book_id,
            quantity = sale.quantity,
            "Sale deleted, stock restored"
        );

        Ok(sale)
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bookstore_core::{Customer, NewAuthor, NewBook, NewCustomer, ValidationError};

    struct Fixture {
        db: Database,
        book: Book,
        customer: Customer,
    }

    async fn fixture(stock: i64) -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let author = db
            .authors()
            .create(&NewAuthor::new("Jane Doe", Some("Kenyan")))
            .await
            .unwrap();
        let book = db
            .books()
            .create(&NewBook::new("My Book", "12.99".parse().unwrap(), stock, author.id))
            .await
            .unwrap();
        let customer = db
            .customers()
            .create(&NewCustomer::new("Bob", Some("bob@example.com")))
            .await
            .unwrap();
        Fixture { db, book, customer }
    }

    async fn stock_of(db: &Database, book_id: i64) -> i64 {
        db.books().get_by_id(book_id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_record_then_delete_scenario() {
        let f = fixture(5).await;

        let sale = f
            .db
            .sales()
            .record_sale(f.book.id, f.customer.id, 2)
            .await
            .unwrap();

        assert_eq!(sale.quantity, 2);
        assert_eq!(sale.book_id, f.book.id);
        assert_eq!(sale.customer_id, f.customer.id);
        assert_eq!(stock_of(&f.db, f.book.id).await, 3);
        assert_eq!(f.db.sales().list_all().await.unwrap(), vec![sale.clone()]);

        let deleted = f.db.sales().delete_sale(sale.id).await.unwrap();
        assert_eq!(deleted, sale);
        assert_eq!(stock_of(&f.db, f.book.id).await, 5);
        assert_eq!(f.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sale_date_defaults_to_now() {
        let f = fixture(1).await;

        let before = Utc::now();
        let sale = f
            .db
            .sales()
            .record_sale(f.book.id, f.customer.id, Sale::DEFAULT_QUANTITY)
            .await
            .unwrap();
        let after = Utc::now();

        assert!(sale.date >= before && sale.date <= after);
        assert_eq!(f.db.sales().get_by_id(sale.id).await.unwrap(), Some(sale));
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_stock_unchanged() {
        let f = fixture(3).await;

        let err = f
            .db
            .sales()
            .record_sale(f.book.id, f.customer.id, 4)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::InsufficientStock {
                available: 3,
                requested: 4,
                ..
            }
        ));
        assert_eq!(stock_of(&f.db, f.book.id).await, 3);
        assert_eq!(f.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_selling_exact_stock_reaches_zero() {
        let f = fixture(2).await;
        let sales = f.db.sales();

        sales.record_sale(f.book.id, f.customer.id, 2).await.unwrap();
        assert_eq!(stock_of(&f.db, f.book.id).await, 0);

        let err = sales.record_sale(f.book.id, f.customer.id, 1).await.unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { .. }));
        assert_eq!(stock_of(&f.db, f.book.id).await, 0);
    }

    #[tokio::test]
    async fn test_large_quantity_limited_only_by_stock() {
        let f = fixture(5000).await;
        let sale = f
            .db
            .sales()
            .record_sale(f.book.id, f.customer.id, 1000)
            .await
            .unwrap();
        assert_eq!(sale.quantity, 1000);
        assert_eq!(stock_of(&f.db, f.book.id).await, 4000);

        let f = fixture(5).await;
        let err = f
            .db
            .sales()
            .record_sale(f.book.id, f.customer.id, 1000)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock {
                available: 5,
                requested: 1000,
                ..
            }
        ));
        assert_eq!(stock_of(&f.db, f.book.id).await, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_never_oversell() {
        const STOCK: i64 = 3;
        const BUYERS: usize = 20;

        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("shop.db")).max_connections(8))
            .await
            .unwrap();
        let author = db
            .authors()
            .create(&NewAuthor::new("Jane Doe", None))
            .await
            .unwrap();
        let book = db
            .books()
            .create(&NewBook::new("My Book", "12.99".parse().unwrap(), STOCK, author.id))
            .await
            .unwrap();
        let customer = db
            .customers()
            .create(&NewCustomer::new("Bob", None))
            .await
            .unwrap();

        let handles: Vec<_> = (0..BUYERS)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { db.sales().record_sale(book.id, customer.id, 1).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        let stock = stock_of(&db, book.id).await;
        assert!(stock >= 0);
        assert!(successes <= STOCK);
        assert_eq!(stock, STOCK - successes);
        assert_eq!(db.sales().count().await.unwrap(), successes);

        db.close().await;
    }

    #[tokio::test]
    async fn test_missing_book_or_customer() {
        let f = fixture(5).await;
        let sales = f.db.sales();

        let err = sales.record_sale(999, f.customer.id, 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, id: 999 } if entity == "Book"));

        let err = sales.record_sale(f.book.id, 999, 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, id: 999 } if entity == "Customer"));

        assert_eq!(stock_of(&f.db, f.book.id).await, 5);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let f = fixture(5).await;

        for qty in [0, -2] {
            let err = f
                .db
                .sales()
                .record_sale(f.book.id, f.customer.id, qty)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                DbError::Validation(ValidationError::MustBePositive { .. })
            ));
        }
        assert_eq!(stock_of(&f.db, f.book.id).await, 5);
    }

    #[tokio::test]
    async fn test_delete_missing_sale() {
        let f = fixture(1).await;
        let err = f.db.sales().delete_sale(42).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn test_stock_never_negative_across_sequence() {
        let f = fixture(4).await;
        let sales = f.db.sales();
        let mut recorded = Vec::new();

        for qty in [1, 3, 2, 1, 5, 1] {
            if let Ok(sale) = sales.record_sale(f.book.id, f.customer.id, qty).await {
                recorded.push(sale);
            }
            assert!(stock_of(&f.db, f.book.id).await >= 0);
        }

        let sold: i64 = recorded.iter().map(|s| s.quantity).sum();
        assert_eq!(stock_of(&f.db, f.book.id).await, 4 - sold);

        for sale in recorded {
            sales.delete_sale(sale.id).await.unwrap();
            assert!(stock_of(&f.db, f.book.id).await >= 0);
        }
        assert_eq!(stock_of(&f.db, f.book.id).await, 4);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let f = fixture(10).await;
        let amy = f
            .db
            .customers()
            .create(&NewCustomer::new("Amy", None))
            .await
            .unwrap();

        let sales = f.db.sales();
        let s1 = sales.record_sale(f.book.id, f.customer.id, 1).await.unwrap();
        let s2 = sales.record_sale(f.book.id, amy.id, 2).await.unwrap();
        let s3 = sales.record_sale(f.book.id, f.customer.id, 3).await.unwrap();

        assert_eq!(sales.list_by_customer(f.customer.id).await.unwrap(), vec![s1.clone(), s3.clone()]);
        assert_eq!(sales.list_by_customer(amy.id).await.unwrap(), vec![s2.clone()]);
        assert!(sales.list_by_customer(999).await.unwrap().is_empty());
        assert_eq!(sales.list_by_book(f.book.id).await.unwrap(), vec![s1, s2, s3]);
    }

    #[tokio::test]
    async fn test_restore_skipped_when_book_row_missing() {
        let f = fixture(3).await;
        let sale = f
            .db
            .sales()
            .record_sale(f.book.id, f.customer.id, 1)
            .await
            .unwrap();

        // Simulate a row removed behind the application's back
        sqlx::query("PRAGMA foreign_keys = OFF")
            .execute(f.db.pool())
            .await
            .unwrap();
        sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(f.book.id)
            .execute(f.db.pool())
            .await
            .unwrap();

        let deleted = f.db.sales().delete_sale(sale.id).await.unwrap();
        assert_eq!(deleted.id, sale.id);
        assert_eq!(f.db.sales().count().await.unwrap(), 0);
    }
}
