use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

/// Ask for a value on stdin. Empty answers are asked again.
pub fn ask(question: &str) -> Result<String> {
    let stdin = io::stdin();
    let mut lines = stdin.lock();
    loop {
        print!("{}: ", question);
        io::stdout().flush()?;

        let mut line = String::new();
        let read = lines.read_line(&mut line).context("Failed to read stdin")?;
        if read == 0 {
            bail!("No input for \"{}\"", question);
        }
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

/// Use `value` if given, otherwise prompt for it.
pub fn or_ask(value: Option<String>, question: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => ask(question),
    }
}
