//! Database health check.
//!
//! Connection, migration status and row counts in one report.

use std::io::Write;

use super::AppContext;
use crate::error::{CliError, CliResult, ErrorCode};

pub async fn check<W: Write>(ctx: &AppContext, out: &mut W) -> CliResult<()> {
    writeln!(out, "Database:   {}", ctx.config.db_path.display())?;

    if !ctx.db.health_check().await {
        return Err(CliError::new(
            ErrorCode::StorageError,
            "Database connection failed",
        ));
    }
    writeln!(out, "Connection: OK")?;

    let status = ctx.db.migration_status().await?;
    writeln!(out, "Migrations: {}/{} applied", status.applied, status.total)?;
    for (version, description) in &status.pending {
        writeln!(out, "  pending:  {:03} {}", version, description)?;
    }

    writeln!(
        out,
        "Records:    {} author(s), {} book(s), {} customer(s), {} sale(s)",
        ctx.db.authors().count().await?,
        ctx.db.books().count().await?,
        ctx.db.customers().count().await?,
        ctx.db.sales().count().await?,
    )?;
    Ok(())
}
