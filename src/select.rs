use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("invalid choice")]
    InvalidChoice,
    #[error("could not show menu: {0}")]
    Output(#[from] io::Error),
}

/// Prints a 1-based menu of `candidates` and reads one line from `input`.
///
/// Returns the zero-based index of the chosen candidate. Anything that is not
/// a number in range, including a failed or empty read, is an invalid choice.
/// There is no second attempt.
pub fn select_candidate<R: BufRead, W: Write>(
    candidates: &[String],
    input: &mut R,
    out: &mut W,
) -> Result<usize, SelectError> {
    writeln!(out, "Select a file to patch:")?;
    for (i, name) in candidates.iter().enumerate() {
        writeln!(out, "{}) {}", i + 1, name)?;
    }
    write!(out, "Enter your choice: ")?;
    out.flush()?;

    let mut line = String::new();
    if let Err(e) = input.read_line(&mut line) {
        debug!(error = %e, "could not read choice");
        return Err(SelectError::InvalidChoice);
    }

    parse_choice(&line, candidates.len()).ok_or(SelectError::InvalidChoice)
}

fn parse_choice(line: &str, count: usize) -> Option<usize> {
    let choice: i64 = line.trim().parse().ok()?;
    if choice < 1 || choice as u64 > count as u64 {
        return None;
    }
    Some(choice as usize - 1)
}
