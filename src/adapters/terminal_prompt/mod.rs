//! Terminal prompt adapter
//!
//! Prompts are written to stderr so that stdout stays free for command
//! output; answers are read line by line from stdin.

use std::io::{self, BufRead};

use console::{style, Term};

use crate::domain::errors::*;
use crate::ports::*;

/// Line-oriented prompter over any buffered reader
pub struct TerminalPrompter<R: BufRead> {
    input: R,
    term: Term,
}

impl TerminalPrompter<io::StdinLock<'static>> {
    /// Prompter reading from the process's stdin
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> TerminalPrompter<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            term: Term::stderr(),
        }
    }

    fn read_line(&mut self) -> Result<String, DomainError> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| DomainError::FsFail(format!("Failed to read from stdin: {}", e)))?;
        if read == 0 {
            // input closed
            let _ = self.term.write_line("");
            return Err(DomainError::EditAborted);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, DomainError> {
        self.term
            .write_str(prompt)
            .and_then(|_| self.term.flush())
            .map_err(|e| DomainError::FsFail(format!("Failed to write prompt: {}", e)))?;
        self.read_line()
    }
}

impl<R: BufRead> PromptPort for TerminalPrompter<R> {
    fn read_value(&mut self, label: &str, default: Option<&str>) -> Result<String, DomainError> {
        let prompt = match default {
            Some(default) if !default.is_empty() => {
                format!("{} [{}]: ", style(label).bold(), style(default).dim())
            }
            _ => format!("{}: ", style(label).bold()),
        };
        let answer = self.ask(&prompt)?;
        if answer.trim().is_empty() {
            return Ok(default.unwrap_or_default().to_string());
        }
        Ok(answer)
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, DomainError> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.ask(&format!("{} {} ", style(question).bold(), hint))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.warn("Please answer y or n"),
            }
        }
    }

    fn warn(&mut self, message: &str) {
        let _ = self
            .term
            .write_line(&format!("{} {}", style("⚠").yellow().bold(), style(message).yellow()));
    }

    fn show(&mut self, message: &str) {
        let _ = self.term.write_line(message);
    }
}
