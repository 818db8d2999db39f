//! Undo journal for the consolidation steps.
//!
//! Every file operation goes through a [`Transaction`], which records what it
//! committed. A backup is recorded only after the copy into `.backup`
//! finished, so every recorded backup can be restored. On failure the
//! journal is replayed in reverse: backups are copied back, created files are
//! deleted and the backup folder is removed. Undo is best-effort; failures
//! are collected and reported, not retried.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::layout::ProjectLayout;

use super::ConsolidateError;

/// A committed file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
  /// A file written by this run.
  Created(PathBuf),
  /// `original` was copied to `backup` and then removed.
  Backed { backup: PathBuf, original: PathBuf },
}

/// An undo step that failed during rollback.
#[derive(Debug, Error)]
pub enum RollbackFailure {
  #[error("failed to restore {} from {}: {source}", original.display(), backup.display())]
  Restore {
    backup: PathBuf,
    original: PathBuf,
    source: io::Error,
  },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },
}

/// What a successful run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Committed {
  pub created: Vec<PathBuf>,
  /// Moved files, relative to the project root with `/` separators.
  pub moved: Vec<String>,
}

pub struct Transaction<'a> {
  layout: &'a ProjectLayout,
  entries: Vec<JournalEntry>,
  moved: Vec<String>,
}

impl<'a> Transaction<'a> {
  pub fn begin(layout: &'a ProjectLayout) -> Self {
    Self {
      layout,
      entries: Vec::new(),
      moved: Vec::new(),
    }
  }

  pub fn entries(&self) -> &[JournalEntry] {
    &self.entries
  }

  /// Write a new file, creating parent folders.
  pub fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<(), ConsolidateError> {
    create_parent(path)?;
    fs::write(path, contents).map_err(|source| ConsolidateError::Write {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "created file");
    self.entries.push(JournalEntry::Created(path.to_path_buf()));
    Ok(())
  }

  /// Byte-copy `from` to a new file at `to`.
  pub fn copy_file(&mut self, from: &Path, to: &Path) -> Result<(), ConsolidateError> {
    create_parent(to)?;
    fs::copy(from, to).map_err(|source| ConsolidateError::Copy {
      from: from.to_path_buf(),
      to: to.to_path_buf(),
      source,
    })?;
    debug!(from = %from.display(), to = %to.display(), "copied file");
    self.entries.push(JournalEntry::Created(to.to_path_buf()));
    Ok(())
  }

  /// Copy `original` into the backup folder, then delete it.
  ///
  /// Returns the project-relative path that was moved.
  pub fn move_to_backup(&mut self, original: &Path) -> Result<String, ConsolidateError> {
    let backup = self.layout.backup_path_for(original);
    create_parent(&backup)?;
    fs::copy(original, &backup).map_err(|source| ConsolidateError::Copy {
      from: original.to_path_buf(),
      to: backup.clone(),
      source,
    })?;
    self.entries.push(JournalEntry::Backed {
      backup: backup.clone(),
      original: original.to_path_buf(),
    });

    fs::remove_file(original).map_err(|source| ConsolidateError::Remove {
      path: original.to_path_buf(),
      source,
    })?;

    let relative = self.layout.relative_display(original);
    debug!(file = %relative, backup = %backup.display(), "moved file to backup");
    self.moved.push(relative.clone());
    Ok(relative)
  }

  pub fn commit(self) -> Committed {
    let created = self
      .entries
      .into_iter()
      .filter_map(|entry| match entry {
        JournalEntry::Created(path) => Some(path),
        JournalEntry::Backed { .. } => None,
      })
      .collect();
    Committed {
      created,
      moved: self.moved,
    }
  }

  /// Undo every committed entry, newest first, then drop the backup folder.
  pub fn rollback(self) -> Vec<RollbackFailure> {
    info!(entries = self.entries.len(), "rolling back consolidation");
    let mut failures = Vec::new();

    for entry in self.entries.into_iter().rev() {
      match entry {
        JournalEntry::Backed { backup, original } => {
          if let Err(source) = restore(&backup, &original) {
            error!(original = %original.display(), error = %source, "failed to restore backup");
            failures.push(RollbackFailure::Restore {
              backup,
              original,
              source,
            });
          } else {
            debug!(original = %original.display(), "restored backup");
          }
        }
        JournalEntry::Created(path) => {
          if let Err(source) = remove_if_exists(&path, false) {
            error!(path = %path.display(), error = %source, "failed to remove created file");
            failures.push(RollbackFailure::Remove { path, source });
          } else {
            debug!(path = %path.display(), "removed created file");
          }
        }
      }
    }

    let backup_dir = self.layout.backup_dir();
    if let Err(source) = remove_if_exists(&backup_dir, true) {
      error!(path = %backup_dir.display(), error = %source, "failed to remove backup folder");
      failures.push(RollbackFailure::Remove {
        path: backup_dir,
        source,
      });
    }

    failures
  }
}

fn create_parent(path: &Path) -> Result<(), ConsolidateError> {
  match path.parent() {
    Some(parent) => fs::create_dir_all(parent).map_err(|source| ConsolidateError::CreateDir {
      path: parent.to_path_buf(),
      source,
    }),
    None => Ok(()),
  }
}

fn restore(backup: &Path, original: &Path) -> io::Result<()> {
  if let Some(parent) = original.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::copy(backup, original).map(|_| ())
}

fn remove_if_exists(path: &Path, dir: bool) -> io::Result<()> {
  let result = if dir {
    fs::remove_dir_all(path)
  } else {
    fs::remove_file(path)
  };
  match result {
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    other => other,
  }
}
