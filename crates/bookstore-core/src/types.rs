//! # Domain Types
//!
//! The four records of the bookstore and the drafts used to create them.
//!
//! ## Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Entity Relationships                            │
//! │                                                                         │
//! │  ┌──────────────┐ 1     * ┌──────────────┐ 1     * ┌──────────────┐    │
//! │  │    Author    │────────►│     Book     │────────►│     Sale     │    │
//! │  │  ──────────  │ cascade │  ──────────  │ blocks  │  ──────────  │    │
//! │  │  id          │         │  id          │ delete  │  id          │    │
//! │  │  name        │         │  title       │         │  book_id     │    │
//! │  │  nationality │         │  price_cents │         │  customer_id │    │
//! │  └──────────────┘         │  stock       │         │  quantity    │    │
//! │                           │  author_id   │         │  date        │    │
//! │                           └──────────────┘         └──────▲───────┘    │
//! │                                                           │ *          │
//! │                           ┌──────────────┐ 1              │            │
//! │                           │   Customer   │────────────────┘            │
//! │                           │  id, name,   │  blocks delete              │
//! │                           │  email       │                             │
//! │                           └──────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are integers assigned by the store; listing order is id order, which
//! is insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{
    validate_email, validate_price_cents, validate_required_text, validate_stock,
};

// =============================================================================
// Author
// =============================================================================

/// A book author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub nationality: Option<String>,
}

impl Author {
    /// Checks the fields an update would persist.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required_text("name", &self.name)
    }
}

/// Input for creating an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub nationality: Option<String>,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>, nationality: Option<&str>) -> Self {
        NewAuthor {
            name: name.into().trim().to_string(),
            nationality: crate::validation::normalize_optional(nationality),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required_text("name", &self.name)
    }
}

// =============================================================================
// Book
// =============================================================================

/// A title on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    pub id: i64,
    pub title: String,
    /// Price in minor units.
    pub price_cents: i64,
    /// Unsold copies. Never negative.
    pub stock: i64,
    pub author_id: i64,
}

impl Book {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks that `quantity` copies can be sold from current stock.
    ///
    /// ```rust
    /// use bookstore_core::Book;
    ///
    /// let book = Book { id: 1, title: "My Book".into(), price_cents: 1299, stock: 5, author_id: 1 };
    /// assert!(book.check_can_sell(5).is_ok());
    /// assert!(book.check_can_sell(6).is_err());
    /// ```
    pub fn check_can_sell(&self, quantity: i64) -> CoreResult<()> {
        if self.stock >= quantity {
            return Ok(());
        }

        Err(CoreError::InsufficientStock {
            book_id: self.id,
            title: self.title.clone(),
            available: self.stock,
            requested: quantity,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required_text("title", &self.title)?;
        validate_price_cents(self.price_cents)?;
        validate_stock(self.stock)
    }
}

/// Input for creating a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub price: Money,
    pub stock: i64,
    pub author_id: i64,
}

impl NewBook {
    pub fn new(title: impl Into<String>, price: Money, stock: i64, author_id: i64) -> Self {
        NewBook {
            title: title.into().trim().to_string(),
            price,
            stock,
            author_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required_text("title", &self.title)?;
        validate_price_cents(self.price.cents())?;
        validate_stock(self.stock)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

impl Customer {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required_text("name", &self.name)?;
        validate_email(self.email.as_deref())
    }
}

/// Input for creating a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, email: Option<&str>) -> Self {
        NewCustomer {
            name: name.into().trim().to_string(),
            email: crate::validation::normalize_optional(email),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required_text("name", &self.name)?;
        validate_email(self.email.as_deref())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale. Never edited; only deleted, which restocks the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub book_id: i64,
    pub customer_id: i64,
    pub quantity: i64,
    pub date: DateTime<Utc>,
}

impl Sale {
    /// Quantity used when the operator does not give one.
    pub const DEFAULT_QUANTITY: i64 = 1;
}

/// A book bought by a customer, with the total copies across their sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchasedBook {
    pub book_id: i64,
    pub title: String,
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(stock: i64) -> Book {
        Book {
            id: 1,
            title: "My Book".to_string(),
            price_cents: 1299,
            stock,
            author_id: 1,
        }
    }

    #[test]
    fn test_check_can_sell() {
        assert!(book(5).check_can_sell(1).is_ok());
        assert!(book(5).check_can_sell(5).is_ok());

        match book(3).check_can_sell(5) {
            Err(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 3);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn test_book_price() {
        assert_eq!(book(1).price().to_string(), "12.99");
    }

    #[test]
    fn test_new_author_normalizes_blank_nationality() {
        let author = NewAuthor::new("  Jane Doe ", Some("  "));
        assert_eq!(author.name, "Jane Doe");
        assert_eq!(author.nationality, None);
        assert!(author.validate().is_ok());

        assert!(NewAuthor::new("", Some("Kenyan")).validate().is_err());
    }

    #[test]
    fn test_new_book_validation() {
        let price = Money::from_cents(1299);
        assert!(NewBook::new("My Book", price, 5, 1).validate().is_ok());
        assert!(NewBook::new("", price, 5, 1).validate().is_err());
        assert!(NewBook::new("My Book", price, -1, 1).validate().is_err());
        assert!(NewBook::new("My Book", Money::from_cents(-1), 5, 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_new_customer_validation() {
        assert!(NewCustomer::new("Bob", Some("bob@example.com")).validate().is_ok());
        assert!(NewCustomer::new("Bob", Some("")).validate().is_ok());
        assert!(NewCustomer::new("Bob", Some("not-an-email")).validate().is_err());
    }

    #[test]
    fn test_entity_validation_on_update() {
        let mut b = book(2);
        assert!(b.validate().is_ok());
        b.stock = -1;
        assert!(b.validate().is_err());

        let customer = Customer {
            id: 1,
            name: " ".to_string(),
            email: None,
        };
        assert!(customer.validate().is_err());
    }

    #[test]
    fn test_sale_serializes_date_as_rfc3339() {
        let sale = Sale {
            id: 1,
            book_id: 2,
            customer_id: 3,
            quantity: Sale::DEFAULT_QUANTITY,
            date: "2026-01-31T10:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_string(&sale).unwrap();
        assert!(json.contains("\"date\":\"2026-01-31T10:00:00Z\""));
    }
}
