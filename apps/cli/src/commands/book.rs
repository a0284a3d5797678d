//! Book commands.

use std::io::Write;

use bookstore_core::{Book, Money, NewBook};

use super::{print_json, AppContext};
use crate::error::{CliError, CliResult};

/// Fields to change on edit. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<i64>,
    pub author_id: Option<i64>,
}

pub async fn add<W: Write>(ctx: &AppContext, draft: NewBook, out: &mut W) -> CliResult<Book> {
    let book = ctx.db.books().create(&draft).await?;
    writeln!(
        out,
        "✅ Book '{}' added successfully! ID: {}",
        book.title, book.id
    )?;
    Ok(book)
}

pub async fn list<W: Write>(ctx: &AppContext, json: bool, out: &mut W) -> CliResult<()> {
    let books = ctx.db.books().list_all().await?;

    if json {
        return print_json(out, &books);
    }
    if books.is_empty() {
        writeln!(out, "No books found.")?;
        return Ok(());
    }

    for book in &books {
        writeln!(out, "{}", line(ctx, book))?;
    }
    Ok(())
}

pub async fn edit<W: Write>(
    ctx: &AppContext,
    id: i64,
    changes: BookChanges,
    out: &mut W,
) -> CliResult<Book> {
    let mut book = ctx
        .db
        .books()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CliError::not_found("Book", id))?;

    if let Some(title) = changes.title {
        book.title = title.trim().to_string();
    }
    if let Some(price) = changes.price {
        book.price_cents = price.cents();
    }
    if let Some(stock) = changes.stock {
        book.stock = stock;
    }
    if let Some(author_id) = changes.author_id {
        book.author_id = author_id;
    }

    ctx.db.books().update(&book).await?;
    writeln!(out, "✅ Book {} updated: {}", book.id, line(ctx, &book))?;
    Ok(book)
}

pub async fn delete<W: Write>(ctx: &AppContext, id: i64, out: &mut W) -> CliResult<()> {
    ctx.db.books().delete(id).await?;
    writeln!(out, "✅ Book {} deleted.", id)?;
    Ok(())
}

/// Books whose author is `author_id`.
pub async fn by_author<W: Write>(
    ctx: &AppContext,
    author_id: i64,
    json: bool,
    out: &mut W,
) -> CliResult<()> {
    let books = ctx.db.books().list_by_author(author_id).await?;

    if json {
        return print_json(out, &books);
    }
    if books.is_empty() {
        writeln!(out, "No books found for this author.")?;
        return Ok(());
    }

    writeln!(out, "Books by this author:")?;
    for book in &books {
        writeln!(out, "- {} ({} in stock)", book.title, book.stock)?;
    }
    Ok(())
}

pub(crate) fn line(ctx: &AppContext, book: &Book) -> String {
    format!(
        "{}: {} | {} | Stock: {} | Author ID: {}",
        book.id,
        book.title,
        ctx.price(book.price()),
        book.stock,
        book.author_id
    )
}
