//! Idempotent ignore-file updates.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IgnoreError {
  #[error("failed to read ignore file {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to write ignore file {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// Append `entry` to the ignore file unless an identical line already exists.
///
/// Creates the file when missing. Returns whether a line was added.
pub fn add_path_to_ignore(ignore_file: &Path, entry: &str) -> Result<bool, IgnoreError> {
  let entry = entry.trim();
  let existing = match fs::read_to_string(ignore_file) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
    Err(source) => {
      return Err(IgnoreError::Read {
        path: ignore_file.to_path_buf(),
        source,
      });
    }
  };

  if existing.lines().any(|line| line.trim() == entry) {
    debug!(path = %ignore_file.display(), entry, "ignore entry already present");
    return Ok(false);
  }

  let mut line = String::new();
  if !existing.is_empty() && !existing.ends_with('\n') {
    line.push('\n');
  }
  line.push_str(entry);
  line.push('\n');

  let write_err = |source| IgnoreError::Write {
    path: ignore_file.to_path_buf(),
    source,
  };
  let mut file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(ignore_file)
    .map_err(write_err)?;
  file.write_all(line.as_bytes()).map_err(write_err)?;

  debug!(path = %ignore_file.display(), entry, "added ignore entry");
  Ok(true)
}
