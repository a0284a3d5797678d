//! Command line arguments.
//!
//! With no subcommand the interactive menu starts.

use bookstore_core::{Money, Sale};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bookstore", version)]
#[command(about = "Bookstore inventory and sales tracker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// SQLite database file (overrides BOOKSTORE_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Directory for CSV reports (overrides BOOKSTORE_REPORT_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage authors
    Author {
        #[command(subcommand)]
        action: AuthorCommand,
    },

    /// Manage books
    Book {
        #[command(subcommand)]
        action: BookCommand,
    },

    /// Manage customers
    Customer {
        #[command(subcommand)]
        action: CustomerCommand,
    },

    /// Record, list and delete sales
    Sale {
        #[command(subcommand)]
        action: SaleCommand,
    },

    /// Export CSV reports
    Report {
        #[command(subcommand)]
        action: ReportCommand,
    },

    /// Start the interactive menu
    Menu,

    /// Check the database connection and migrations
    Check,
}

/// Shared `--json` switch for listings.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ListArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum AuthorCommand {
    /// Add an author
    Add {
        name: String,
        #[arg(long)]
        nationality: Option<String>,
    },

    /// List all authors
    #[command(alias = "ls")]
    List(ListArgs),

    /// Change an author's fields (omitted flags keep their value)
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        /// Pass an empty string to clear
        #[arg(long)]
        nationality: Option<String>,
    },

    /// Delete an author and all of their books
    #[command(alias = "rm")]
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum BookCommand {
    /// Add a book
    Add {
        title: String,
        /// Price, e.g. 12.99
        #[arg(long)]
        price: Money,
        #[arg(long)]
        stock: i64,
        /// Author id
        #[arg(long)]
        author: i64,
    },

    /// List all books
    #[command(alias = "ls")]
    List(ListArgs),

    /// Change a book's fields (omitted flags keep their value)
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        price: Option<Money>,
        #[arg(long)]
        stock: Option<i64>,
        #[arg(long)]
        author: Option<i64>,
    },

    /// Delete a book without sales
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// List the books written by one author
    ByAuthor {
        author_id: i64,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// Add a customer
    Add {
        name: String,
        #[arg(long)]
        email: Option<String>,
    },

    /// List all customers
    #[command(alias = "ls")]
    List(ListArgs),

    /// Change a customer's fields (omitted flags keep their value)
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        /// Pass an empty string to clear
        #[arg(long)]
        email: Option<String>,
    },

    /// Delete a customer without sales
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// List the books a customer has bought
    Books {
        customer_id: i64,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum SaleCommand {
    /// Sell copies of a book to a customer
    Record {
        #[arg(long)]
        book: i64,
        #[arg(long)]
        customer: i64,
        #[arg(long, default_value_t = Sale::DEFAULT_QUANTITY)]
        quantity: i64,
    },

    /// List sales
    #[command(alias = "ls")]
    List {
        /// Only sales to this customer
        #[arg(long)]
        customer: Option<i64>,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Delete a sale and restore the book's stock
    #[command(alias = "rm")]
    Delete { id: i64 },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ReportCommand {
    /// Write sales_report_<timestamp>.csv
    Sales,
    /// Write inventory_report_<timestamp>.csv
    Inventory,
}
