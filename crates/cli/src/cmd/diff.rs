//! Implementation of the `teamsfx diff` command.

use std::path::Path;

use anyhow::{Context, Result};
use teamsfx_lib::manifest_diff::{IGNORED_KEYS, compare_manifest_files};

use crate::output::{OutputFormat, print_json, print_success, print_warning};

/// Compare two manifest templates the way the upgrade does.
///
/// Differences are reported, not treated as failure.
pub fn cmd_diff(local: &Path, remote: &Path, format: OutputFormat) -> Result<()> {
  let equivalent = compare_manifest_files(local, remote).context("Failed to compare manifest templates")?;

  if format.is_json() {
    return print_json(&serde_json::json!({
      "local": local.display().to_string(),
      "remote": remote.display().to_string(),
      "equivalent": equivalent,
      "ignored_keys": IGNORED_KEYS,
    }));
  }

  if equivalent {
    print_success("Manifest templates are equivalent.");
  } else {
    print_warning(&format!(
      "Manifest templates differ (ignoring {}).",
      IGNORED_KEYS.join(", ")
    ));
  }
  Ok(())
}
