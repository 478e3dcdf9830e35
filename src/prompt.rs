//! Line-oriented operator prompts.
//!
//! The create command talks to the operator only through [`Prompter`], so the
//! same collection code runs against a terminal or a scripted input in tests.

use crate::error::{PodsvcError, Result};
use std::io::{BufRead, Write};

/// Question-and-answer interface used while collecting a definition.
pub trait Prompter {
    /// Free-form answer, trimmed. An empty answer yields `default` (or "").
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String>;

    /// Yes/no question. An empty answer yields `default`.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;

    /// Numbered menu. Returns the zero-based index of the chosen option and
    /// asks again on an out-of-range answer.
    fn choose(&mut self, question: &str, options: &[&str], default: usize) -> Result<usize>;

    /// Informational line shown to the operator.
    fn notice(&mut self, message: &str);
}

/// [`Prompter`] over any reader/writer pair; stdin/stdout in production.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter and return the writer.
    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String> {
        let _ = self.output.flush();
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(|e| {
            PodsvcError::UserError(format!("failed to read input: {}", e))
        })?;
        if read == 0 {
            return Err(PodsvcError::UserError(
                "input ended before all questions were answered".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(d) if !d.is_empty() => {
                let _ = write!(self.output, "{} [{}]: ", question, d);
            }
            _ => {
                let _ = write!(self.output, "{}: ", question);
            }
        }
        let answer = self.read_line()?;
        if answer.is_empty() {
            return Ok(default.unwrap_or("").to_string());
        }
        Ok(answer)
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let _ = write!(self.output, "{} [{}]: ", question, hint);
            let answer = self.read_line()?.to_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => {
                    let _ = writeln!(self.output, "Please answer y or n.");
                }
            }
        }
    }

    fn choose(&mut self, question: &str, options: &[&str], default: usize) -> Result<usize> {
        let _ = writeln!(self.output, "{}", question);
        for (i, option) in options.iter().enumerate() {
            let _ = writeln!(self.output, "  {}) {}", i + 1, option);
        }
        loop {
            let _ = write!(self.output, "Choice [{}]: ", default + 1);
            let answer = self.read_line()?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => {
                    let _ = writeln!(
                        self.output,
                        "Please enter a number between 1 and {}.",
                        options.len()
                    );
                }
            }
        }
    }

    fn notice(&mut self, message: &str) {
        let _ = writeln!(self.output, "{}", message);
    }
}
