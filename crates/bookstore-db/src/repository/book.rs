//! # Book Repository
//!
//! Database operations for books.
//!
//! ## Key Operations
//! - CRUD operations
//! - Filtered listings (books by author, books bought by a customer)
//!
//! Stock is only adjusted here through `update`, which the operator uses to
//! restock. Sales move stock through [`SaleRepository`](super::sale::SaleRepository)
//! inside a transaction.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use bookstore_core::{Book, NewBook, PurchasedBook};

const BOOK_COLUMNS: &str = "id, title, price_cents, stock, author_id";

/// Repository for book database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.books();
///
/// let book = repo.create(&NewBook::new("My Book", price, 5, author.id)).await?;
/// let by_author = repo.list_by_author(author.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Inserts a new book.
    ///
    /// ## Returns
    /// * `Ok(Book)` - Stored book with its assigned id
    /// * `Err(DbError::Validation)` - Blank title, negative price or stock
    /// * `Err(DbError::NotFound)` - `author_id` does not exist
    pub async fn create(&self, book: &NewBook) -> DbResult<Book> {
        book.validate()?;

        debug!(title = %book.title, author_id = book.author_id, "Inserting book");

        self.ensure_author_exists(book.author_id).await?;

        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, price_cents, stock, author_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(&book.title)
        .bind(book.price.cents())
        .bind(book.stock)
        .bind(book.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Gets a book by id. `Ok(None)` when it doesn't exist.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Lists all books in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Lists the books written by one author.
    ///
    /// An unknown author yields an empty list, not an error.
    pub async fn list_by_author(&self, author_id: i64) -> DbResult<Vec<Book>> {
        debug!(author_id, "Listing books by author");

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE author_id = ?1 ORDER BY id"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Lists the distinct books a customer has bought, with total copies.
    ///
    /// Ordered by the customer's first purchase of each title.
    pub async fn list_purchased_by(&self, customer_id: i64) -> DbResult<Vec<PurchasedBook>> {
        debug!(customer_id, "Listing books bought by customer");

        let books = sqlx::query_as::<_, PurchasedBook>(
            r#"
            SELECT
                b.id AS book_id,
                b.title AS title,
                SUM(s.quantity) AS quantity
            FROM sales s
            INNER JOIN books b ON b.id = s.book_id
            WHERE s.customer_id = ?1
            GROUP BY b.id, b.title
            ORDER BY MIN(s.id)
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Persists title, price, stock and author of an existing book.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Book (or the new author) doesn't exist
    pub async fn update(&self, book: &Book) -> DbResult<()> {
        book.validate()?;

        debug!(id = book.id, "Updating book");

        self.ensure_author_exists(book.author_id).await?;

        let result = sqlx::query(
            r#"
            UPDATE books SET
                title = ?2,
                price_cents = ?3,
                stock = ?4,
                author_id = ?5
            WHERE id = ?1
            "#,
        )
        .bind(book.id)
        .bind(book.title.trim())
        .bind(book.price_cents)
        .bind(book.stock)
        .bind(book.author_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", book.id));
        }

        Ok(())
    }

    /// Deletes a book that has no sales.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Book doesn't exist
    /// * `Err(DbError::ReferentialIntegrity)` - Book has sales
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting book");

        let mut tx = self.pool.begin().await?;

        let dependent_sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE book_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if dependent_sales > 0 {
            return Err(DbError::ReferentialIntegrity {
                entity: "Book".to_string(),
                id,
                dependents: dependent_sales,
            });
        }

        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id, "Book deleted");
        Ok(())
    }

    /// Counts books (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn ensure_author_exists(&self, author_id: i64) -> DbResult<()> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors WHERE id = ?1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        if exists == 0 {
            return Err(DbError::not_found("Author", author_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bookstore_core::{Money, NewAuthor, NewCustomer};

    async fn db_with_author() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let author = db
            .authors()
            .create(&NewAuthor::new("Jane Doe", Some("Kenyan")))
            .await
            .unwrap();
        (db, author.id)
    }

    fn price(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (db, author_id) = db_with_author().await;

        let book = db
            .books()
            .create(&NewBook::new("My Book", price("12.99"), 5, author_id))
            .await
            .unwrap();

        assert_eq!(book.title, "My Book");
        assert_eq!(book.price_cents, 1299);
        assert_eq!(book.stock, 5);
        assert_eq!(book.author_id, author_id);

        assert_eq!(db.books().get_by_id(book.id).await.unwrap(), Some(book));
    }

    #[tokio::test]
    async fn test_create_with_unknown_author() {
        let (db, _) = db_with_author().await;

        let err = db
            .books()
            .create(&NewBook::new("Orphan", price("1"), 1, 999))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { id: 999, .. }));
        assert_eq!(db.books().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_stock() {
        let (db, author_id) = db_with_author().await;

        let err = db
            .books()
            .create(&NewBook::new("Bad", price("1"), -1, author_id))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_by_author_matches_exactly() {
        let (db, jane) = db_with_author().await;
        let john = db
            .authors()
            .create(&NewAuthor::new("John Roe", None))
            .await
            .unwrap()
            .id;
        let lonely = db
            .authors()
            .create(&NewAuthor::new("No Books", None))
            .await
            .unwrap()
            .id;

        let repo = db.books();
        let a = repo.create(&NewBook::new("A", price("1"), 1, jane)).await.unwrap();
        let _b = repo.create(&NewBook::new("B", price("1"), 1, john)).await.unwrap();
        let c = repo.create(&NewBook::new("C", price("1"), 1, jane)).await.unwrap();

        assert_eq!(repo.list_by_author(jane).await.unwrap(), vec![a, c]);
        assert_eq!(repo.list_by_author(john).await.unwrap().len(), 1);
        assert!(repo.list_by_author(lonely).await.unwrap().is_empty());
        assert!(repo.list_by_author(12345).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_restock() {
        let (db, author_id) = db_with_author().await;
        let repo = db.books();

        let mut book = repo
            .create(&NewBook::new("My Book", price("12.99"), 5, author_id))
            .await
            .unwrap();
        book.stock = 20;
        book.price_cents = 1499;
        repo.update(&book).await.unwrap();

        let fetched = repo.get_by_id(book.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 20);
        assert_eq!(fetched.price().to_string(), "14.99");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (db, author_id) = db_with_author().await;

        let ghost = Book {
            id: 55,
            title: "Ghost".to_string(),
            price_cents: 0,
            stock: 0,
            author_id,
        };
        let err = db.books().update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 55, .. }));
    }

    #[tokio::test]
    async fn test_delete_without_sales() {
        let (db, author_id) = db_with_author().await;

        let book = db
            .books()
            .create(&NewBook::new("Gone", price("1"), 1, author_id))
            .await
            .unwrap();
        db.books().delete(book.id).await.unwrap();

        assert_eq!(db.books().get_by_id(book.id).await.unwrap(), None);
        assert!(matches!(
            db.books().delete(book.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_sales() {
        let (db, author_id) = db_with_author().await;

        let book = db
            .books()
            .create(&NewBook::new("Sold", price("5"), 3, author_id))
            .await
            .unwrap();
        let customer = db
            .customers()
            .create(&NewCustomer::new("Bob", None))
            .await
            .unwrap();
        db.sales().record_sale(book.id, customer.id, 1).await.unwrap();

        let err = db.books().delete(book.id).await.unwrap_err();
        assert!(matches!(err, DbError::ReferentialIntegrity { .. }));
        assert!(db.books().get_by_id(book.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_purchased_by_groups_sales() {
        let (db, author_id) = db_with_author().await;

        let first = db
            .books()
            .create(&NewBook::new("First", price("5"), 10, author_id))
            .await
            .unwrap();
        let second = db
            .books()
            .create(&NewBook::new("Second", price("5"), 10, author_id))
            .await
            .unwrap();
        let bob = db
            .customers()
            .create(&NewCustomer::new("Bob", None))
            .await
            .unwrap();
        let amy = db
            .customers()
            .create(&NewCustomer::new("Amy", None))
            .await
            .unwrap();

        let sales = db.sales();
        sales.record_sale(second.id, bob.id, 1).await.unwrap();
        sales.record_sale(first.id, bob.id, 2).await.unwrap();
        sales.record_sale(second.id, bob.id, 3).await.unwrap();
        sales.record_sale(first.id, amy.id, 1).await.unwrap();

        let bought = db.books().list_purchased_by(bob.id).await.unwrap();
        assert_eq!(bought.len(), 2);
        assert_eq!(bought[0].title, "Second");
        assert_eq!(bought[0].quantity, 4);
        assert_eq!(bought[1].title, "First");
        assert_eq!(bought[1].quantity, 2);

        assert!(db.books().list_purchased_by(999).await.unwrap().is_empty());
    }
}
