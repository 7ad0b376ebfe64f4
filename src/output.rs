use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{AppError, Result};

/// Writes `text` plus a single trailing newline to `path`, creating or
/// truncating it.
pub fn save_response(text: &str, path: &Path) -> Result<()> {
    let to_error = |source: io::Error| {
        tracing::warn!(path = %path.display(), "could not save response: {}", source);
        AppError::FileWrite { source }
    };

    let mut writer = BufWriter::new(File::create(path).map_err(to_error)?);
    writeln!(writer, "{text}").map_err(to_error)?;
    writer.flush().map_err(to_error)?;

    tracing::debug!(path = %path.display(), bytes = text.len() + 1, "response saved");
    Ok(())
}
