//! Report export commands.

use std::io::Write;

use super::AppContext;
use crate::args::ReportCommand;
use crate::error::CliResult;
use crate::export::{self, ExportSummary};

pub async fn export<W: Write>(
    ctx: &AppContext,
    report: ReportCommand,
    out: &mut W,
) -> CliResult<ExportSummary> {
    let dir = &ctx.config.report_dir;

    let (label, summary) = match report {
        ReportCommand::Sales => ("Sales", export::export_sales(&ctx.db, dir).await?),
        ReportCommand::Inventory => ("Inventory", export::export_inventory(&ctx.db, dir).await?),
    };

    writeln!(
        out,
        "✅ {} report exported successfully: {} ({} row(s))",
        label,
        summary.path.display(),
        summary.rows
    )?;
    Ok(summary)
}
