//! # Report Projections
//!
//! Read-only joins that feed the CSV exports.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales_rows()        sales ──► books ──► customers                     │
//! │                      one row per sale, ordered by sale id               │
//! │                                                                         │
//! │  inventory_rows()    books ──► authors                                  │
//! │                      one row per book, ordered by book id               │
//! │                                                                         │
//! │  Both return a Stream: rows are decoded as the consumer pulls them,    │
//! │  so an export never holds the whole table in memory.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use futures_util::{Stream, TryStreamExt};
use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use bookstore_core::{InventoryReportRow, SalesReportRow};

const SALES_REPORT_SQL: &str = r#"
    SELECT
        s.id        AS sale_id,
        b.title     AS book_title,
        c.name      AS customer_name,
        s.quantity  AS quantity,
        s.date      AS date
    FROM sales s
    INNER JOIN books b ON b.id = s.book_id
    INNER JOIN customers c ON c.id = s.customer_id
    ORDER BY s.id
"#;

const INVENTORY_REPORT_SQL: &str = r#"
    SELECT
        b.title       AS book_title,
        a.name        AS author_name,
        b.price_cents AS price,
        b.stock       AS stock
    FROM books b
    INNER JOIN authors a ON a.id = b.author_id
    ORDER BY b.id
"#;

/// Read-only report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Streams one row per sale with the book title and customer name.
    pub fn sales_rows(&self) -> impl Stream<Item = DbResult<SalesReportRow>> + '_ {
        sqlx::query_as::<_, SalesReportRow>(SALES_REPORT_SQL)
            .fetch(&self.pool)
            .map_err(DbError::from)
    }

    /// Streams one row per book with its author's name.
    pub fn inventory_rows(&self) -> impl Stream<Item = DbResult<InventoryReportRow>> + '_ {
        sqlx::query_as::<_, InventoryReportRow>(INVENTORY_REPORT_SQL)
            .fetch(&self.pool)
            .map_err(DbError::from)
    }
}
