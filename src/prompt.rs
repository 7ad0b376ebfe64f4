use std::io::{BufRead, Write};

use crate::error::{AppError, Result};

/// Reads one line from `input`, without its line terminator.
pub fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(AppError::Console)?;
    if read == 0 {
        return Err(AppError::InputClosed);
    }

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

/// Prints `question` on its own line and reads the answer.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    writeln!(output, "{question}")
        .and_then(|_| output.flush())
        .map_err(AppError::Console)?;
    read_line(input)
}
