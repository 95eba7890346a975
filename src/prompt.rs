//! Interactive prompt port.

use std::io::{self, BufRead, Write};

/// Asks the user a question and returns the trimmed answer.
pub trait Prompt {
    fn ask(&mut self, message: &str) -> io::Result<String>;
}

/// [`Prompt`] on the controlling terminal (stdout + stdin).
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, message: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{message}")?;
        stdout.flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}
