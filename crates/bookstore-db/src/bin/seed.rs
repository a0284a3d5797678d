//! # Seed Data Generator
//!
//! Populates the database with sample authors, books and customers for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./bookstore_dev.db
//! cargo run -p bookstore-db --bin seed
//!
//! # Specify database path
//! cargo run -p bookstore-db --bin seed -- --db ./data/bookstore.db
//!
//! # Also record a few sales
//! cargo run -p bookstore-db --bin seed -- --with-sales
//! ```

use bookstore_core::{Money, NewAuthor, NewBook, NewCustomer};
use bookstore_db::{Database, DbConfig};
use std::env;

/// (author, nationality, [(title, price, stock)])
const CATALOG: &[(&str, &str, &[(&str, &str, i64)])] = &[
    (
        "Ngũgĩ wa Thiong'o",
        "Kenyan",
        &[
            ("Weep Not, Child", "950.00", 12),
            ("The River Between", "870.50", 8),
            ("Petals of Blood", "1200.00", 4),
        ],
    ),
    (
        "Chinua Achebe",
        "Nigerian",
        &[
            ("Things Fall Apart", "1050.00", 15),
            ("No Longer at Ease", "900.00", 6),
        ],
    ),
    (
        "Margaret Ogola",
        "Kenyan",
        &[("The River and the Source", "1100.00", 10)],
    ),
    (
        "Chimamanda Ngozi Adichie",
        "Nigerian",
        &[
            ("Half of a Yellow Sun", "1450.00", 7),
            ("Purple Hibiscus", "1300.00", 0),
        ],
    ),
];

const CUSTOMERS: &[(&str, Option<&str>)] = &[
    ("Wanjiku Kamau", Some("wanjiku@example.com")),
    ("Otieno Odhiambo", Some("otieno@example.com")),
    ("Amina Hassan", None),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bookstore_dev.db");
    let mut with_sales = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--with-sales" => with_sales = true,
            "--help" | "-h" => {
                println!("Bookstore Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bookstore_dev.db)");
                println!("      --with-sales   Record a few sample sales");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Bookstore Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.authors().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} authors", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut book_ids = Vec::new();
    for &(name, nationality, books) in CATALOG {
        let author = db
            .authors()
            .create(&NewAuthor::new(name, Some(nationality)))
            .await?;

        for &(title, price, stock) in books {
            let price: Money = price.parse()?;
            let book = db
                .books()
                .create(&NewBook::new(title, price, stock, author.id))
                .await?;
            book_ids.push(book.id);
        }
    }
    println!("✓ Added {} authors, {} books", CATALOG.len(), book_ids.len());

    let mut customer_ids = Vec::new();
    for &(name, email) in CUSTOMERS {
        let customer = db.customers().create(&NewCustomer::new(name, email)).await?;
        customer_ids.push(customer.id);
    }
    println!("✓ Added {} customers", customer_ids.len());

    if with_sales {
        let mut recorded = 0;
        for (n, customer_id) in customer_ids.iter().enumerate() {
            let book_id = book_ids[n % book_ids.len()];
            match db.sales().record_sale(book_id, *customer_id, (n as i64) + 1).await {
                Ok(_) => recorded += 1,
                Err(e) => eprintln!("Failed to record sale for book {}: {}", book_id, e),
            }
        }
        println!("✓ Recorded {} sales", recorded);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
