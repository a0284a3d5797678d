//! # Report Rows
//!
//! Flat, denormalized rows produced by joining the entity tables.
//! Serde renames double as CSV column headers.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::money::Money;

/// One row per sale: Sale → Book → Customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesReportRow {
    #[serde(rename = "Sale ID")]
    pub sale_id: i64,
    #[serde(rename = "Book Title")]
    pub book_title: String,
    #[serde(rename = "Customer")]
    pub customer_name: String,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(rename = "Date", serialize_with = "serialize_timestamp")]
    pub date: DateTime<Utc>,
}

/// One row per book: Book → Author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryReportRow {
    #[serde(rename = "Book Title")]
    pub book_title: String,
    #[serde(rename = "Author")]
    pub author_name: String,
    #[serde(rename = "Price", serialize_with = "serialize_display")]
    pub price: Money,
    #[serde(rename = "Stock")]
    pub stock: i64,
}

fn serialize_timestamp<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format("%Y-%m-%d %H:%M:%S"))
}

fn serialize_display<S: Serializer>(money: &Money, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(money)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_row_serializes_price_as_decimal() {
        let row = InventoryReportRow {
            book_title: "My Book".to_string(),
            author_name: "Jane Doe".to_string(),
            price: Money::from_cents(1299),
            stock: 5,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Price"], "12.99");
        assert_eq!(json["Book Title"], "My Book");
    }

    #[test]
    fn test_sales_row_serializes_plain_timestamp() {
        let row = SalesReportRow {
            sale_id: 1,
            book_title: "My Book".to_string(),
            customer_name: "Bob".to_string(),
            quantity: 2,
            date: "2026-01-31T10:15:00Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Date"], "2026-01-31 10:15:00");
        assert_eq!(json["Sale ID"], 1);
    }
}
