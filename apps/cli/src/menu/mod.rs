//! # Interactive Menu
//!
//! Numbered menu loop, the default mode of the `bookstore` binary.
//!
//! ## Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────► print menu                                               │
//! │   │                │                                                    │
//! │   │                ▼                                                    │
//! │   │           read choice ──── "0" / end of input ───► Goodbye          │
//! │   │                │                                                    │
//! │   │                ▼                                                    │
//! │   │        prompts for fields  (numbers re-asked until they parse)     │
//! │   │                │                                                    │
//! │   │                ▼                                                    │
//! │   │        commands::<entity>::<op>  (same handlers as subcommands)    │
//! │   │                │                                                    │
//! │   │          Ok ───┴─── Err ──► "❌ Error [CODE]: message"              │
//! │   │                │                                                    │
//! │   └────────────────┘     errors never leave the loop                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod prompt;

use std::io::{self, BufRead, Write};
use tracing::debug;

use bookstore_core::{Money, NewAuthor, NewBook, NewCustomer, Sale};
use bookstore_db::DbError;

use crate::args::ReportCommand;
use crate::commands::author::{self, AuthorChanges};
use crate::commands::book::{self, BookChanges};
use crate::commands::customer::{self, CustomerChanges};
use crate::commands::{report, sale, AppContext};
use crate::error::{CliError, CliResult};
use prompt::{PromptError, Prompter};

const MENU: &str = "
📚 BOOKSTORE INVENTORY SYSTEM 📚
 1. Add author          2. View authors        3. Edit author         4. Delete author
 5. Add book            6. View books          7. Edit book           8. Delete book
 9. Add customer       10. View customers     11. Edit customer      12. Delete customer
13. Record sale        14. View sales         15. Delete sale
16. Books by author    17. Books by customer
18. Export sales report                       19. Export inventory report
 0. Exit
";

const NUMBER_RETRY: &str = "Please enter a valid number.";
const PRICE_RETRY: &str = "Please enter a valid price, e.g. 12.99.";

/// Typed "-" on an edit prompt clears an optional field.
const CLEAR_MARKER: &str = "-";

/// How a menu action ended without success.
#[derive(Debug)]
enum MenuError {
    Closed,
    Failed(CliError),
}

impl From<PromptError> for MenuError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Closed => MenuError::Closed,
            PromptError::Io(e) => MenuError::Failed(e.into()),
        }
    }
}

impl From<CliError> for MenuError {
    fn from(err: CliError) -> Self {
        MenuError::Failed(err)
    }
}

impl From<DbError> for MenuError {
    fn from(err: DbError) -> Self {
        MenuError::Failed(err.into())
    }
}

impl From<io::Error> for MenuError {
    fn from(err: io::Error) -> Self {
        MenuError::Failed(err.into())
    }
}

type MenuResult = Result<(), MenuError>;

/// Runs the menu until the operator exits or input ends.
pub async fn run<R: BufRead, W: Write>(ctx: &AppContext, input: R, output: W) -> CliResult<()> {
    let mut menu = Menu {
        ctx,
        prompt: Prompter::new(input, output),
    };

    loop {
        write!(menu.prompt.out(), "{}", MENU)?;

        let choice = match menu.prompt.ask("Select an option (0-19): ") {
            Ok(choice) => choice,
            Err(PromptError::Closed) => break,
            Err(PromptError::Io(e)) => return Err(e.into()),
        };

        if choice == "0" {
            writeln!(menu.prompt.out(), "👋 Goodbye!")?;
            return Ok(());
        }

        debug!(choice = %choice, "Menu selection");
        match menu.handle(&choice).await {
            Ok(()) => {}
            Err(MenuError::Closed) => break,
            Err(MenuError::Failed(e)) => writeln!(menu.prompt.out(), "❌ {}", e)?,
        }
    }

    writeln!(menu.prompt.out())?;
    Ok(())
}

struct Menu<'a, R, W> {
    ctx: &'a AppContext,
    prompt: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    async fn handle(&mut self, choice: &str) -> MenuResult {
        let ctx = self.ctx;

        match choice {
            "1" => self.add_author().await,
            "2" => Ok(author::list(ctx, false, self.prompt.out()).await?),
            "3" => self.edit_author().await,
            "4" => self.delete_author().await,
            "5" => self.add_book().await,
            "6" => Ok(book::list(ctx, false, self.prompt.out()).await?),
            "7" => self.edit_book().await,
            "8" => {
                let id = self.ask_id("Enter book ID: ")?;
                Ok(book::delete(ctx, id, self.prompt.out()).await?)
            }
            "9" => self.add_customer().await,
            "10" => Ok(customer::list(ctx, false, self.prompt.out()).await?),
            "11" => self.edit_customer().await,
            "12" => {
                let id = self.ask_id("Enter customer ID: ")?;
                Ok(customer::delete(ctx, id, self.prompt.out()).await?)
            }
            "13" => self.record_sale().await,
            "14" => Ok(sale::list(ctx, None, false, self.prompt.out()).await?),
            "15" => {
                let id = self.ask_id("Enter sale ID: ")?;
                sale::delete(ctx, id, self.prompt.out()).await?;
                Ok(())
            }
            "16" => {
                let id = self.ask_id("Enter author ID: ")?;
                Ok(book::by_author(ctx, id, false, self.prompt.out()).await?)
            }
            "17" => {
                let id = self.ask_id("Enter customer ID: ")?;
                Ok(customer::books(ctx, id, false, self.prompt.out()).await?)
            }
            "18" => {
                report::export(ctx, ReportCommand::Sales, self.prompt.out()).await?;
                Ok(())
            }
            "19" => {
                report::export(ctx, ReportCommand::Inventory, self.prompt.out()).await?;
                Ok(())
            }
            _ => {
                writeln!(self.prompt.out(), "❌ Invalid choice. Please try again.")?;
                Ok(())
            }
        }
    }

    fn ask_id(&mut self, label: &str) -> Result<i64, MenuError> {
        Ok(self.prompt.ask_parsed(label, NUMBER_RETRY)?)
    }

    // -------------------------------------------------------------------------
    // Authors
    // -------------------------------------------------------------------------

    async fn add_author(&mut self) -> MenuResult {
        let name = self.prompt.ask("Enter author name: ")?;
        let nationality = self.prompt.ask("Enter nationality (optional): ")?;

        author::add(
            self.ctx,
            NewAuthor::new(name, Some(nationality.as_str())),
            self.prompt.out(),
        )
        .await?;
        Ok(())
    }

    async fn edit_author(&mut self) -> MenuResult {
        let id = self.ask_id("Enter author ID: ")?;
        let current = self
            .ctx
            .db
            .authors()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CliError::not_found("Author", id))?;

        writeln!(self.prompt.out(), "Leave blank to keep, '-' to clear.")?;
        let name = self.prompt.ask_keep("Name", &current.name)?;
        let nationality = self
            .prompt
            .ask_keep("Nationality", current.nationality.as_deref().unwrap_or(""))?
            .map(cleared);

        author::edit(
            self.ctx,
            id,
            AuthorChanges { name, nationality },
            self.prompt.out(),
        )
        .await?;
        Ok(())
    }

    async fn delete_author(&mut self) -> MenuResult {
        let id = self.ask_id("Enter author ID: ")?;
        let confirm = self
            .prompt
            .ask(&format!("Delete author {} and all of their books? [y/N]: ", id))?;

        if !confirm.eq_ignore_ascii_case("y") {
            writeln!(self.prompt.out(), "Cancelled.")?;
            return Ok(());
        }

        author::delete(self.ctx, id, self.prompt.out()).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Books
    // -------------------------------------------------------------------------

    async fn add_book(&mut self) -> MenuResult {
        let authors = self.ctx.db.authors().list_all().await?;
        if authors.is_empty() {
            writeln!(self.prompt.out(), "❌ No authors yet. Add an author first.")?;
            return Ok(());
        }

        let title = self.prompt.ask("Enter book title: ")?;
        let price: Money = self.prompt.ask_parsed(
            &format!("Enter price ({}): ", self.ctx.config.currency),
            PRICE_RETRY,
        )?;
        let stock: i64 = self
            .prompt
            .ask_parsed("Enter stock quantity: ", NUMBER_RETRY)?;

        writeln!(self.prompt.out(), "\nAvailable authors:")?;
        for a in &authors {
            writeln!(self.prompt.out(), "{}", author::line(a))?;
        }
        let author_id = self.ask_id("Enter author ID: ")?;

        book::add(
            self.ctx,
            NewBook::new(title, price, stock, author_id),
            self.prompt.out(),
        )
        .await?;
        Ok(())
    }

    async fn edit_book(&mut self) -> MenuResult {
        let id = self.ask_id("Enter book ID: ")?;
        let current = self
            .ctx
            .db
            .books()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CliError::not_found("Book", id))?;

        writeln!(self.prompt.out(), "Leave blank to keep.")?;
        let title = self.prompt.ask_keep("Title", &current.title)?;
        let price = self.prompt.ask_parsed_or_blank::<Money>(
            &format!("Price [{}]: ", current.price()),
            PRICE_RETRY,
        )?;
        let stock = self.prompt.ask_parsed_or_blank::<i64>(
            &format!("Stock [{}]: ", current.stock),
            NUMBER_RETRY,
        )?;
        let author_id = self.prompt.ask_parsed_or_blank::<i64>(
            &format!("Author ID [{}]: ", current.author_id),
            NUMBER_RETRY,
        )?;

        let changes = BookChanges {
            title,
            price,
            stock,
            author_id,
        };
        book::edit(self.ctx, id, changes, self.prompt.out()).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    async fn add_customer(&mut self) -> MenuResult {
        let name = self.prompt.ask("Enter customer name: ")?;
        let email = self.prompt.ask("Enter email (optional): ")?;

        customer::add(
            self.ctx,
            NewCustomer::new(name, Some(email.as_str())),
            self.prompt.out(),
        )
        .await?;
        Ok(())
    }

    async fn edit_customer(&mut self) -> MenuResult {
        let id = self.ask_id("Enter customer ID: ")?;
        let current = self
            .ctx
            .db
            .customers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CliError::not_found("Customer", id))?;

        writeln!(self.prompt.out(), "Leave blank to keep, '-' to clear.")?;
        let name = self.prompt.ask_keep("Name", &current.name)?;
        let email = self
            .prompt
            .ask_keep("Email", current.email.as_deref().unwrap_or(""))?
            .map(cleared);

        customer::edit(
            self.ctx,
            id,
            CustomerChanges { name, email },
            self.prompt.out(),
        )
        .await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    async fn record_sale(&mut self) -> MenuResult {
        let books = self.ctx.db.books().list_all().await?;
        let customers = self.ctx.db.customers().list_all().await?;

        if books.is_empty() {
            writeln!(self.prompt.out(), "❌ No books available.")?;
            return Ok(());
        }
        if customers.is_empty() {
            writeln!(self.prompt.out(), "❌ No customers available.")?;
            return Ok(());
        }

        writeln!(self.prompt.out(), "\nAvailable Books:")?;
        for b in &books {
            writeln!(self.prompt.out(), "{}: {} (Stock: {})", b.id, b.title, b.stock)?;
        }
        writeln!(self.prompt.out(), "\nAvailable Customers:")?;
        for c in &customers {
            writeln!(self.prompt.out(), "{}", customer::line(c))?;
        }

        let book_id = self.ask_id("Enter book ID: ")?;
        let customer_id = self.ask_id("Enter customer ID: ")?;
        let quantity = self
            .prompt
            .ask_parsed_or_blank::<i64>(
                &format!("Enter quantity [{}]: ", Sale::DEFAULT_QUANTITY),
                NUMBER_RETRY,
            )?
            .unwrap_or(Sale::DEFAULT_QUANTITY);

        sale::record(self.ctx, book_id, customer_id, quantity, self.prompt.out()).await?;
        Ok(())
    }
}

fn cleared(answer: String) -> String {
    if answer == CLEAR_MARKER {
        String::new()
    } else {
        answer
    }
}
