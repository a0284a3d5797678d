//! # CSV Export
//!
//! Writes the report projections to timestamped CSV files.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db.reports().sales_rows()  ──► Stream<SalesReportRow>                  │
//! │                                   │  one row at a time                 │
//! │                                   ▼                                     │
//! │  csv::Writer ──► <report_dir>/sales_report_20260131_101500.csv         │
//! │                                                                         │
//! │  Header is written first, so an empty table still yields a valid file. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Local;
use futures_util::{pin_mut, Stream, TryStreamExt};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use bookstore_db::{Database, DbResult};

use crate::error::CliResult;

pub const SALES_HEADERS: [&str; 5] = ["Sale ID", "Book Title", "Customer", "Quantity", "Date"];
pub const INVENTORY_HEADERS: [&str; 4] = ["Book Title", "Author", "Price", "Stock"];

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// Exports one row per sale.
pub async fn export_sales(db: &Database, dir: &Path) -> CliResult<ExportSummary> {
    let reports = db.reports();
    let path = report_path(dir, "sales_report")?;
    let rows = write_csv(reports.sales_rows(), &SALES_HEADERS, &path).await?;

    info!(path = %path.display(), rows, "Sales report exported");
    Ok(ExportSummary { path, rows })
}

/// Exports one row per book.
pub async fn export_inventory(db: &Database, dir: &Path) -> CliResult<ExportSummary> {
    let reports = db.reports();
    let path = report_path(dir, "inventory_report")?;
    let rows = write_csv(reports.inventory_rows(), &INVENTORY_HEADERS, &path).await?;

    info!(path = %path.display(), rows, "Inventory report exported");
    Ok(ExportSummary { path, rows })
}

fn report_path(dir: &Path, prefix: &str) -> CliResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    Ok(dir.join(format!("{}_{}.csv", prefix, stamp)))
}

async fn write_csv<T, S>(rows: S, headers: &[&str], path: &Path) -> CliResult<usize>
where
    T: Serialize,
    S: Stream<Item = DbResult<T>>,
{
    debug!(path = %path.display(), "Writing CSV");

    // Serde would only emit the header alongside the first record
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(headers)?;

    pin_mut!(rows);
    let mut count = 0;
    while let Some(row) = rows.try_next().await? {
        writer.serialize(&row)?;
        count += 1;
    }

    writer.flush()?;
    Ok(count)
}
