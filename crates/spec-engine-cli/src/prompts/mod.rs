//! Line-oriented terminal prompts.

use std::io::{self, BufRead, BufReader, IsTerminal, Stdin, Stdout, Write};

use thiserror::Error;

/// Prompt errors.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Input ended before an answer was given.
    #[error("input closed")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Asks questions on a writer and reads answers from a reader.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
    hide_secrets: bool,
}

impl Prompter<BufReader<Stdin>, Stdout> {
    /// Prompter bound to the process stdin and stdout. Secrets are read
    /// without echo when stdin is a terminal.
    pub fn stdio() -> Self {
        Self {
            reader: BufReader::new(io::stdin()),
            writer: io::stdout(),
            hide_secrets: io::stdin().is_terminal(),
        }
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            hide_secrets: false,
        }
    }

    /// Consume the prompter, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Print a line.
    pub fn say(&mut self, line: &str) -> Result<(), PromptError> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    /// Ask a question on its own line and read the answer after a `> `
    /// marker.
    pub fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.writer, "{question}\n> ")?;
        self.writer.flush()?;
        self.read_line()
    }

    /// Numbered menu. Returns the zero-based index of the choice, or `None`
    /// when the answer is not one of the listed numbers.
    pub fn select(&mut self, title: &str, options: &[&str]) -> Result<Option<usize>, PromptError> {
        writeln!(self.writer, "{title}")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "{}. {option}", i + 1)?;
        }
        write!(self.writer, "> ")?;
        self.writer.flush()?;
        let choice = self.read_line()?;
        Ok(choice
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=options.len()).contains(n))
            .map(|n| n - 1))
    }

    /// Yes/no question, asked until the answer is `y` or `n`.
    pub fn confirm(&mut self, question: &str) -> Result<bool, PromptError> {
        loop {
            match self.ask(question)?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Enter y or n.")?,
            }
        }
    }

    /// Read a secret. Echo is disabled on a terminal.
    pub fn password(&mut self, message: &str) -> Result<String, PromptError> {
        if self.hide_secrets {
            self.writer.flush()?;
            let secret = rpassword::prompt_password(format!("{message} "))?;
            return Ok(secret.trim().to_string());
        }
        write!(self.writer, "{message} ")?;
        self.writer.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> Result<String, PromptError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_trims_answer() {
        let mut p = prompter("  CSV files  \n");
        assert_eq!(p.ask("What inputs?").unwrap(), "CSV files");
        assert_eq!(String::from_utf8(p.into_writer()).unwrap(), "What inputs?\n> ");
    }

    #[test]
    fn test_eof_is_cancelled() {
        let mut p = prompter("");
        assert!(matches!(p.ask("Name?"), Err(PromptError::Cancelled)));
    }

    #[test]
    fn test_select() {
        let mut p = prompter("2\n9\nabc\n");
        assert_eq!(p.select("Menu", &["A", "B"]).unwrap(), Some(1));
        assert_eq!(p.select("Menu", &["A", "B"]).unwrap(), None);
        assert_eq!(p.select("Menu", &["A", "B"]).unwrap(), None);
        let out = String::from_utf8(p.into_writer()).unwrap();
        assert!(out.starts_with("Menu\n1. A\n2. B\n> "));
    }

    #[test]
    fn test_confirm_repeats_until_valid() {
        let mut p = prompter("maybe\nY\n");
        assert!(p.confirm("Continue?").unwrap());
        assert!(String::from_utf8(p.into_writer())
            .unwrap()
            .contains("Enter y or n."));
    }

    #[test]
    fn test_password_reads_line_off_terminal() {
        let mut p = prompter("sk-test\n");
        assert_eq!(p.password("Token:").unwrap(), "sk-test");
        assert_eq!(String::from_utf8(p.into_writer()).unwrap(), "Token: ");
    }
}
