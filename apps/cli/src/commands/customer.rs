//! Customer commands.

use std::io::Write;

use bookstore_core::validation::normalize_optional;
use bookstore_core::{Customer, NewCustomer};

use super::{print_json, AppContext};
use crate::error::{CliError, CliResult};

/// Fields to change on edit. `None` keeps the stored value; an empty
/// email clears it.
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn add<W: Write>(
    ctx: &AppContext,
    draft: NewCustomer,
    out: &mut W,
) -> CliResult<Customer> {
    let customer = ctx.db.customers().create(&draft).await?;
    writeln!(
        out,
        "✅ Customer '{}' added successfully! ID: {}",
        customer.name, customer.id
    )?;
    Ok(customer)
}

pub async fn list<W: Write>(ctx: &AppContext, json: bool, out: &mut W) -> CliResult<()> {
    let customers = ctx.db.customers().list_all().await?;

    if json {
        return print_json(out, &customers);
    }
    if customers.is_empty() {
        writeln!(out, "No customers found.")?;
        return Ok(());
    }

    for customer in &customers {
        writeln!(out, "{}", line(customer))?;
    }
    Ok(())
}

pub async fn edit<W: Write>(
    ctx: &AppContext,
    id: i64,
    changes: CustomerChanges,
    out: &mut W,
) -> CliResult<Customer> {
    let mut customer = ctx
        .db
        .customers()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CliError::not_found("Customer", id))?;

    if let Some(name) = changes.name {
        customer.name = name.trim().to_string();
    }
    if let Some(email) = changes.email {
        customer.email = normalize_optional(Some(email.as_str()));
    }

    ctx.db.customers().update(&customer).await?;
    writeln!(out, "✅ Customer {} updated: {}", customer.id, line(&customer))?;
    Ok(customer)
}

pub async fn delete<W: Write>(ctx: &AppContext, id: i64, out: &mut W) -> CliResult<()> {
    ctx.db.customers().delete(id).await?;
    writeln!(out, "✅ Customer {} deleted.", id)?;
    Ok(())
}

/// Distinct books a customer bought, with total copies.
pub async fn books<W: Write>(
    ctx: &AppContext,
    customer_id: i64,
    json: bool,
    out: &mut W,
) -> CliResult<()> {
    let purchased = ctx.db.books().list_purchased_by(customer_id).await?;

    if json {
        return print_json(out, &purchased);
    }
    if purchased.is_empty() {
        writeln!(out, "No books found for this customer.")?;
        return Ok(());
    }

    writeln!(out, "Books bought by this customer:")?;
    for book in &purchased {
        writeln!(out, "- {} (x{})", book.title, book.quantity)?;
    }
    Ok(())
}

pub(crate) fn line(customer: &Customer) -> String {
    match &customer.email {
        Some(email) => format!("{}: {} <{}>", customer.id, customer.name, email),
        None => format!("{}: {}", customer.id, customer.name),
    }
}
