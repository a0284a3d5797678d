//! # Author Repository
//!
//! Database operations for authors.
//!
//! ## Cascade On Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  delete(author_id)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │       ├── any sales on this author's books? ──► ReferentialIntegrity    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DELETE FROM authors ── ON DELETE CASCADE ──► books removed            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use bookstore_core::{Author, NewAuthor};

/// Repository for author database operations.
#[derive(Debug, Clone)]
pub struct AuthorRepository {
    pool: SqlitePool,
}

impl AuthorRepository {
    /// Creates a new AuthorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AuthorRepository { pool }
    }

    /// Inserts a new author and returns it with its assigned id.
    pub async fn create(&self, author: &NewAuthor) -> DbResult<Author> {
        author.validate()?;

        debug!(name = %author.name, "Inserting author");

        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, nationality)
            VALUES (?1, ?2)
            RETURNING id, name, nationality
            "#,
        )
        .bind(&author.name)
        .bind(&author.nationality)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Gets an author by id. `Ok(None)` when it doesn't exist.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, name, nationality FROM authors WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    /// Lists all authors in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, name, nationality FROM authors ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Persists the author's name and nationality.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Author no longer exists
    pub async fn update(&self, author: &Author) -> DbResult<()> {
        author.validate()?;

        debug!(id = author.id, "Updating author");

        let result = sqlx::query("UPDATE authors SET name = ?2, nationality = ?3 WHERE id = ?1")
            .bind(author.id)
            .bind(author.name.trim())
            .bind(&author.nationality)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Author", author.id));
        }

        Ok(())
    }

    /// Deletes an author together with all of their books.
    ///
    /// ## Returns
    /// * `Ok(n)` - Number of books removed by the cascade
    /// * `Err(DbError::NotFound)` - Author doesn't exist
    /// * `Err(DbError::ReferentialIntegrity)` - One of the books has sales
    pub async fn delete(&self, id: i64) -> DbResult<u64> {
        debug!(id, "Deleting author");

        let mut tx = self.pool.begin().await?;

        let dependent_sales: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM sales s
            INNER JOIN books b ON b.id = s.book_id
            WHERE b.author_id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if dependent_sales > 0 {
            return Err(DbError::ReferentialIntegrity {
                entity: "Author".to_string(),
                id,
                dependents: dependent_sales,
            });
        }

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM authors WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Author", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id, books_removed = books, "Author deleted");
        Ok(books as u64)
    }

    /// Counts authors (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bookstore_core::{Money, NewBook, NewCustomer, ValidationError};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = db().await;
        let repo = db.authors();

        let author = repo
            .create(&NewAuthor::new("Jane Doe", Some("Kenyan")))
            .await
            .unwrap();

        assert!(author.id > 0);
        assert_eq!(author.name, "Jane Doe");
        assert_eq!(author.nationality.as_deref(), Some("Kenyan"));

        let fetched = repo.get_by_id(author.id).await.unwrap();
        assert_eq!(fetched, Some(author));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = db().await;
        assert_eq!(db.authors().get_by_id(404).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = db().await;

        let err = db
            .authors()
            .create(&NewAuthor::new("  ", None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { .. })
        ));
        assert_eq!(db.authors().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let db = db().await;
        let repo = db.authors();

        assert!(repo.list_all().await.unwrap().is_empty());

        for name in ["Zed", "Amy", "Mo"] {
            repo.create(&NewAuthor::new(name, None)).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Zed", "Amy", "Mo"]);
    }

    #[tokio::test]
    async fn test_update() {
        let db = db().await;
        let repo = db.authors();

        let mut author = repo.create(&NewAuthor::new("Jane", None)).await.unwrap();
        author.name = "Jane Doe".to_string();
        author.nationality = Some("Kenyan".to_string());
        repo.update(&author).await.unwrap();

        assert_eq!(repo.get_by_id(author.id).await.unwrap(), Some(author));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = db().await;

        let ghost = Author {
            id: 77,
            name: "Ghost".to_string(),
            nationality: None,
        };
        let err = db.authors().update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 77, .. }));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_books() {
        let db = db().await;

        let author = db
            .authors()
            .create(&NewAuthor::new("Jane Doe", None))
            .await
            .unwrap();
        let other = db
            .authors()
            .create(&NewAuthor::new("John Roe", None))
            .await
            .unwrap();

        let price = Money::from_cents(1000);
        let b1 = db
            .books()
            .create(&NewBook::new("One", price, 1, author.id))
            .await
            .unwrap();
        let b2 = db
            .books()
            .create(&NewBook::new("Two", price, 1, author.id))
            .await
            .unwrap();
        let kept = db
            .books()
            .create(&NewBook::new("Kept", price, 1, other.id))
            .await
            .unwrap();

        let removed = db.authors().delete(author.id).await.unwrap();
        assert_eq!(removed, 2);

        assert_eq!(db.authors().get_by_id(author.id).await.unwrap(), None);
        assert_eq!(db.books().get_by_id(b1.id).await.unwrap(), None);
        assert_eq!(db.books().get_by_id(b2.id).await.unwrap(), None);
        assert!(db.books().get_by_id(kept.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = db().await;
        let err = db.authors().delete(5).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_blocked_when_books_have_sales() {
        let db = db().await;

        let author = db
            .authors()
            .create(&NewAuthor::new("Jane Doe", None))
            .await
            .unwrap();
        let book = db
            .books()
            .create(&NewBook::new("My Book", Money::from_cents(1299), 5, author.id))
            .await
            .unwrap();
        let customer = db
            .customers()
            .create(&NewCustomer::new("Bob", None))
            .await
            .unwrap();
        db.sales()
            .record_sale(book.id, customer.id, 1)
            .await
            .unwrap();

        let err = db.authors().delete(author.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::ReferentialIntegrity { dependents: 1, .. }
        ));

        assert!(db.authors().get_by_id(author.id).await.unwrap().is_some());
        assert!(db.books().get_by_id(book.id).await.unwrap().is_some());
    }
}
