//! Output writer for the rendered comment.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::errors::{Error, ReviewResult};

/// Writes `body` to `path` as UTF-8, replacing any previous content.
///
/// # Errors
/// Returns [`Error::Output`] if the file cannot be written.
pub fn write_comment(path: &Path, body: &str) -> ReviewResult<()> {
    fs::write(path, body).map_err(|source| Error::Output {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = body.len(), "comment written");
    Ok(())
}
