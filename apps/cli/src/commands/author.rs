//! Author commands.

use std::io::Write;

use bookstore_core::validation::normalize_optional;
use bookstore_core::{Author, NewAuthor};

use super::{print_json, AppContext};
use crate::error::{CliError, CliResult};

/// Fields to change on edit. `None` keeps the stored value; an empty
/// nationality clears it.
#[derive(Debug, Clone, Default)]
pub struct AuthorChanges {
    pub name: Option<String>,
    pub nationality: Option<String>,
}

pub async fn add<W: Write>(ctx: &AppContext, draft: NewAuthor, out: &mut W) -> CliResult<Author> {
    let author = ctx.db.authors().create(&draft).await?;
    writeln!(out, "✅ Author added successfully! ID: {}", author.id)?;
    Ok(author)
}

pub async fn list<W: Write>(ctx: &AppContext, json: bool, out: &mut W) -> CliResult<()> {
    let authors = ctx.db.authors().list_all().await?;

    if json {
        return print_json(out, &authors);
    }
    if authors.is_empty() {
        writeln!(out, "No authors found.")?;
        return Ok(());
    }

    for author in &authors {
        writeln!(out, "{}", line(author))?;
    }
    Ok(())
}

pub async fn edit<W: Write>(
    ctx: &AppContext,
    id: i64,
    changes: AuthorChanges,
    out: &mut W,
) -> CliResult<Author> {
    let mut author = ctx
        .db
        .authors()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CliError::not_found("Author", id))?;

    if let Some(name) = changes.name {
        author.name = name.trim().to_string();
    }
    if let Some(nationality) = changes.nationality {
        author.nationality = normalize_optional(Some(nationality.as_str()));
    }

    ctx.db.authors().update(&author).await?;
    writeln!(out, "✅ Author {} updated: {}", author.id, line(&author))?;
    Ok(author)
}

pub async fn delete<W: Write>(ctx: &AppContext, id: i64, out: &mut W) -> CliResult<()> {
    let books_removed = ctx.db.authors().delete(id).await?;
    writeln!(
        out,
        "✅ Author {} deleted ({} book(s) removed).",
        id, books_removed
    )?;
    Ok(())
}

pub(crate) fn line(author: &Author) -> String {
    match &author.nationality {
        Some(nationality) => format!("{}: {} ({})", author.id, author.name, nationality),
        None => format!("{}: {}", author.id, author.name),
    }
}
