//! Structural comparison of manifest templates.
//!
//! Before the local template is retired the upgrade checks whether it carried
//! anything the remote template lacks. Keys that legitimately differ between
//! the two (names, URLs, schema markers) are skipped. The result only
//! decides whether to warn.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Keys whose values are not compared. They must still be present on both
/// sides.
pub const IGNORED_KEYS: &[&str] = &[
  "name",
  "contentUrl",
  "configurationUrl",
  "manifestVersion",
  "$schema",
  "description",
];

#[derive(Debug, Error)]
pub enum ManifestDiffError {
  #[error("failed to read manifest {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse manifest {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },
}

/// Deep key-set comparison.
///
/// Objects must have identical key sets at every level. Arrays are compared
/// by index, so reordering an array counts as a difference. Scalars must be
/// strictly equal.
pub fn manifests_equivalent(a: &Value, b: &Value) -> bool {
  match (a, b) {
    (Value::Object(left), Value::Object(right)) => {
      left.len() == right.len()
        && left.iter().all(|(key, lv)| match right.get(key) {
          None => false,
          Some(_) if IGNORED_KEYS.contains(&key.as_str()) => true,
          Some(rv) => manifests_equivalent(lv, rv),
        })
    }
    (Value::Array(left), Value::Array(right)) => {
      left.len() == right.len() && left.iter().zip(right).all(|(l, r)| manifests_equivalent(l, r))
    }
    _ => a == b,
  }
}

/// Read both templates and compare them.
pub fn compare_manifest_files(local: &Path, remote: &Path) -> Result<bool, ManifestDiffError> {
  let local = read_manifest(local)?;
  let remote = read_manifest(remote)?;
  Ok(manifests_equivalent(&local, &remote))
}

fn read_manifest(path: &Path) -> Result<Value, ManifestDiffError> {
  let content = fs::read_to_string(path).map_err(|source| ManifestDiffError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  serde_json::from_str(&content).map_err(|source| ManifestDiffError::Parse {
    path: path.to_path_buf(),
    source,
  })
}
