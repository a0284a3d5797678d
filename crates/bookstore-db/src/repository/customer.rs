//! # Customer Repository
//!
//! Database operations for customers. A customer with sales on record
//! cannot be deleted; the sales must be deleted first.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use bookstore_core::{Customer, NewCustomer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer and returns it with its assigned id.
    pub async fn create(&self, customer: &NewCustomer) -> DbResult<Customer> {
        customer.validate()?;

        debug!(name = %customer.name, "Inserting customer");

        let created = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, email)
            VALUES (?1, ?2)
            RETURNING id, name, email
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists all customers in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email FROM customers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Persists name and email of an existing customer.
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        customer.validate()?;

        debug!(id = customer.id, "Updating customer");

        let result = sqlx::query("UPDATE customers SET name = ?2, email = ?3 WHERE id = ?1")
            .bind(customer.id)
            .bind(customer.name.trim())
            .bind(&customer.email)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", customer.id));
        }

        Ok(())
    }

    /// Deletes a customer that has no sales.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Customer doesn't exist
    /// * `Err(DbError::ReferentialIntegrity)` - Customer has sales
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting customer");

        let mut tx = self.pool.begin().await?;

        let dependent_sales: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE customer_id = ?1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if dependent_sales > 0 {
            return Err(DbError::ReferentialIntegrity {
                entity: "Customer".to_string(),
                id,
                dependents: dependent_sales,
            });
        }

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id, "Customer deleted");
        Ok(())
    }

    /// Counts customers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
