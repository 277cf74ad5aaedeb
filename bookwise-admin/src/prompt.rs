//! Confirmation before destructive commands

use std::io::{self, BufRead, Write};

pub trait Confirm {
    /// Ask a yes/no question; only an explicit "y" counts as yes
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Interactive prompt on stdin/stdout
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "\n{} (y/n): ", question)?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(is_yes(&line))
    }
}

/// `--yes`: skip the question
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _question: &str) -> io::Result<bool> {
        Ok(true)
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
