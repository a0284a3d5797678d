//! Line-oriented prompts over any `BufRead`/`Write` pair.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Why a prompt produced no value.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// End of input (Ctrl-D, closed pipe).
    #[error("input closed")]
    Closed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type PromptResult<T> = Result<T, PromptError>;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Where menu output goes.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prints `label` and reads one trimmed line.
    pub fn ask(&mut self, label: &str) -> PromptResult<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line.trim().to_string())
    }

    /// Asks until the answer parses, printing `retry` after each bad answer.
    pub fn ask_parsed<T: FromStr>(&mut self, label: &str, retry: &str) -> PromptResult<T> {
        loop {
            let answer = self.ask(label)?;
            match answer.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "❌ {}", retry)?,
            }
        }
    }

    /// Like [`ask_parsed`](Self::ask_parsed) but a blank answer yields `None`.
    pub fn ask_parsed_or_blank<T: FromStr>(
        &mut self,
        label: &str,
        retry: &str,
    ) -> PromptResult<Option<T>> {
        loop {
            let answer = self.ask(label)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "❌ {}", retry)?,
            }
        }
    }

    /// Shows the current value; a blank answer keeps it (`None`).
    pub fn ask_keep(&mut self, label: &str, current: &str) -> PromptResult<Option<String>> {
        let answer = self.ask(&format!("{} [{}]: ", label, current))?;
        Ok(if answer.is_empty() { None } else { Some(answer) })
    }
}
