//! # bookstore Entry Point
//!
//! The actual setup is in lib.rs so it can be tested.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    bookstore_cli::run().await
}
