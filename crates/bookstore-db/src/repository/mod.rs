//! # Repository Module
//!
//! Database repository implementations for the bookstore.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command / menu action                                             │
//! │       │                                                                 │
//! │       │  db.sales().record_sale(book_id, customer_id, 2)               │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── record_sale(&self, book, customer, qty)                          │
//! │  ├── delete_sale(&self, id)                                            │
//! │  ├── list_all(&self)                                                   │
//! │  └── list_by_customer(&self, id)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every repository validates its input with the rules in `bookstore-core`
//! before it touches the database.
//!
//! ## Available Repositories
//!
//! - [`author::AuthorRepository`] - Author CRUD, cascading delete
//! - [`book::BookRepository`] - Book CRUD, per-author and per-customer views
//! - [`customer::CustomerRepository`] - Customer CRUD
//! - [`sale::SaleRepository`] - Sale recording and reversal

pub mod author;
pub mod book;
pub mod customer;
pub mod sale;
