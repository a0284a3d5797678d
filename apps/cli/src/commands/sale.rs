//! Sale commands.

use std::io::Write;

use bookstore_core::Sale;

use super::{print_json, AppContext};
use crate::error::CliResult;

pub async fn record<W: Write>(
    ctx: &AppContext,
    book_id: i64,
    customer_id: i64,
    quantity: i64,
    out: &mut W,
) -> CliResult<Sale> {
    let sale = ctx
        .db
        .sales()
        .record_sale(book_id, customer_id, quantity)
        .await?;

    let title = ctx
        .db
        .books()
        .get_by_id(book_id)
        .await?
        .map(|b| b.title)
        .unwrap_or_else(|| format!("book {}", book_id));
    let customer = ctx
        .db
        .customers()
        .get_by_id(customer_id)
        .await?
        .map(|c| c.name)
        .unwrap_or_else(|| format!("customer {}", customer_id));

    writeln!(
        out,
        "✅ Sale recorded: {} x '{}' sold to {}! Sale ID: {}",
        sale.quantity, title, customer, sale.id
    )?;
    Ok(sale)
}

/// All sales, or only those of one customer.
pub async fn list<W: Write>(
    ctx: &AppContext,
    customer_id: Option<i64>,
    json: bool,
    out: &mut W,
) -> CliResult<()> {
    let sales = match customer_id {
        Some(id) => ctx.db.sales().list_by_customer(id).await?,
        None => ctx.db.sales().list_all().await?,
    };

    if json {
        return print_json(out, &sales);
    }
    if sales.is_empty() {
        writeln!(out, "No sales found.")?;
        return Ok(());
    }

    for sale in &sales {
        writeln!(out, "{}", line(sale))?;
    }
    Ok(())
}

pub async fn delete<W: Write>(ctx: &AppContext, id: i64, out: &mut W) -> CliResult<Sale> {
    let sale = ctx.db.sales().delete_sale(id).await?;
    writeln!(
        out,
        "✅ Sale {} deleted; {} copy(ies) returned to stock.",
        sale.id, sale.quantity
    )?;
    Ok(sale)
}

pub(crate) fn line(sale: &Sale) -> String {
    format!(
        "{}: Book {} -> Customer {} | Qty: {} | {}",
        sale.id,
        sale.book_id,
        sale.customer_id,
        sale.quantity,
        sale.date.format("%Y-%m-%d %H:%M:%S")
    )
}
