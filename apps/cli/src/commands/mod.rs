//! # Commands
//!
//! One handler per operation. Subcommands and menu items both end up here,
//! so the two surfaces print the same confirmations and errors.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  bookstore book add "My Book" --price 12.99 --stock 5 --author 1       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  dispatch(ctx, Commands::Book { .. }, out)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  book::add(ctx, NewBook, out) ──► db.books().create(..)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "✅ Book 'My Book' added successfully! ID: 1"                         │
//! │                                                                         │
//! │  Menu item 5 ──► prompts ──► book::add(ctx, NewBook, out)  (same call) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`author`] - add / list / edit / delete authors
//! - [`book`] - add / list / edit / delete books, books by author
//! - [`customer`] - add / list / edit / delete customers, books bought
//! - [`sale`] - record / list / delete sales
//! - [`report`] - CSV exports
//! - [`check`] - connection + migration status

pub mod author;
pub mod book;
pub mod check;
pub mod customer;
pub mod report;
pub mod sale;

use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use tracing::info;

use bookstore_core::{Money, NewAuthor, NewBook, NewCustomer};
use bookstore_db::{Database, DbConfig};

use crate::args::{AuthorCommand, BookCommand, Commands, CustomerCommand, SaleCommand};
use crate::config::{AppConfig, ConfigError};
use crate::error::CliResult;
use crate::menu;

/// Everything a handler needs: the database handle and resolved settings.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub db: Database,
    pub config: AppConfig,
}

impl AppContext {
    /// Opens (creating if needed) the configured database.
    pub async fn open(config: AppConfig) -> CliResult<Self> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::Unusable {
                    path: parent.to_path_buf(),
                    reason: e.to_string(),
                })?;
            }
        }

        let db_config = DbConfig::new(&config.db_path).max_connections(config.max_connections);
        let db = Database::new(db_config).await?;

        info!(path = %config.db_path.display(), "Database ready");
        Ok(AppContext { db, config })
    }

    /// Price with the configured currency label, e.g. `Ksh 12.99`.
    pub fn price(&self, money: Money) -> String {
        format!("{} {}", self.config.currency, money)
    }
}

/// Runs one parsed subcommand.
pub async fn dispatch<W: Write>(ctx: &AppContext, command: Commands, out: &mut W) -> CliResult<()> {
    match command {
        Commands::Author { action } => match action {
            AuthorCommand::Add { name, nationality } => {
                author::add(ctx, NewAuthor::new(name, nationality.as_deref()), out).await?;
            }
            AuthorCommand::List(list) => author::list(ctx, list.json, out).await?,
            AuthorCommand::Edit {
                id,
                name,
                nationality,
            } => {
                author::edit(ctx, id, author::AuthorChanges { name, nationality }, out).await?;
            }
            AuthorCommand::Delete { id } => author::delete(ctx, id, out).await?,
        },

        Commands::Book { action } => match action {
            BookCommand::Add {
                title,
                price,
                stock,
                author,
            } => {
                book::add(ctx, NewBook::new(title, price, stock, author), out).await?;
            }
            BookCommand::List(list) => book::list(ctx, list.json, out).await?,
            BookCommand::Edit {
                id,
                title,
                price,
                stock,
                author,
            } => {
                let changes = book::BookChanges {
                    title,
                    price,
                    stock,
                    author_id: author,
                };
                book::edit(ctx, id, changes, out).await?;
            }
            BookCommand::Delete { id } => book::delete(ctx, id, out).await?,
            BookCommand::ByAuthor { author_id, list } => {
                book::by_author(ctx, author_id, list.json, out).await?
            }
        },

        Commands::Customer { action } => match action {
            CustomerCommand::Add { name, email } => {
                customer::add(ctx, NewCustomer::new(name, email.as_deref()), out).await?;
            }
            CustomerCommand::List(list) => customer::list(ctx, list.json, out).await?,
            CustomerCommand::Edit { id, name, email } => {
                customer::edit(ctx, id, customer::CustomerChanges { name, email }, out).await?;
            }
            CustomerCommand::Delete { id } => customer::delete(ctx, id, out).await?,
            CustomerCommand::Books { customer_id, list } => {
                customer::books(ctx, customer_id, list.json, out).await?
            }
        },

        Commands::Sale { action } => match action {
            SaleCommand::Record {
                book,
                customer,
                quantity,
            } => {
                sale::record(ctx, book, customer, quantity, out).await?;
            }
            SaleCommand::List { customer, list } => sale::list(ctx, customer, list.json, out).await?,
            SaleCommand::Delete { id } => {
                sale::delete(ctx, id, out).await?;
            }
        },

        Commands::Report { action } => {
            report::export(ctx, action, out).await?;
        }

        Commands::Menu => {
            let stdin = io::stdin();
            menu::run(ctx, stdin.lock(), out).await?;
        }

        Commands::Check => check::check(ctx, out).await?,
    }

    Ok(())
}

/// Pretty JSON followed by a newline.
pub(crate) fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::{context, text};
    use super::*;
    use crate::args::{ListArgs, ReportCommand};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_dispatch_scenario() {
        let ctx = context().await;
        let mut out = Vec::new();

        let steps = vec![
            Commands::Author {
                action: AuthorCommand::Add {
                    name: "Jane Doe".to_string(),
                    nationality: Some("Kenyan".to_string()),
                },
            },
            Commands::Book {
                action: BookCommand::Add {
                    title: "My Book".to_string(),
                    price: Money::from_cents(1299),
                    stock: 5,
                    author: 1,
                },
            },
            Commands::Customer {
                action: CustomerCommand::Add {
                    name: "Bob".to_string(),
                    email: None,
                },
            },
            Commands::Sale {
                action: SaleCommand::Record {
                    book: 1,
                    customer: 1,
                    quantity: 2,
                },
            },
        ];
        for step in steps {
            dispatch(&ctx, step, &mut out).await.unwrap();
        }

        assert_eq!(ctx.db.books().get_by_id(1).await.unwrap().unwrap().stock, 3);

        dispatch(
            &ctx,
            Commands::Sale {
                action: SaleCommand::Delete { id: 1 },
            },
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(ctx.db.books().get_by_id(1).await.unwrap().unwrap().stock, 5);
        assert_eq!(ctx.db.sales().count().await.unwrap(), 0);
        assert!(text(out).contains("Sale recorded: 2 x 'My Book' sold to Bob"));
    }

    #[tokio::test]
    async fn test_dispatch_reports_domain_errors() {
        let ctx = context().await;
        let mut out = Vec::new();

        let err = dispatch(
            &ctx,
            Commands::Book {
                action: BookCommand::Delete { id: 9 },
            },
            &mut out,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = dispatch(
            &ctx,
            Commands::Author {
                action: AuthorCommand::Add {
                    name: " ".to_string(),
                    nationality: None,
                },
            },
            &mut out,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_dispatch_list_json() {
        let ctx = context().await;
        ctx.db
            .authors()
            .create(&NewAuthor::new("Jane Doe", None))
            .await
            .unwrap();

        let mut out = Vec::new();
        dispatch(
            &ctx,
            Commands::Author {
                action: AuthorCommand::List(ListArgs { json: true }),
            },
            &mut out,
        )
        .await
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["name"], "Jane Doe");
        assert!(value[0]["nationality"].is_null());
    }

    #[tokio::test]
    async fn test_dispatch_report_writes_into_report_dir() {
        let mut ctx = context().await;
        let dir = tempfile::tempdir().unwrap();
        ctx.config.report_dir = dir.path().to_path_buf();

        let mut out = Vec::new();
        dispatch(
            &ctx,
            Commands::Report {
                action: ReportCommand::Inventory,
            },
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert!(text(out).contains("Inventory report exported successfully"));
    }

    #[tokio::test]
    async fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            db_path: dir.path().join("nested").join("bookstore.db"),
            report_dir: dir.path().to_path_buf(),
            currency: "Ksh".to_string(),
            max_connections: 2,
        };

        let ctx = AppContext::open(config).await.unwrap();
        assert!(ctx.db.health_check().await);
        assert!(dir.path().join("nested").join("bookstore.db").exists());
        assert_eq!(ctx.price(Money::from_cents(1299)), "Ksh 12.99");
    }
}
