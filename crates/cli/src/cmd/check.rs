//! Implementation of the `teamsfx check` command.
//!
//! Reports each detection condition so users can see why a project does or
//! does not need the upgrade. Never modifies the project.

use std::path::Path;

use anyhow::{Context, Result};
use teamsfx_lib::config::UpgradeConfig;
use teamsfx_lib::detect::detect;
use teamsfx_lib::layout::ProjectLayout;
use teamsfx_lib::project::ProjectSettings;

use crate::output::{OutputFormat, check_mark, print_info, print_json, print_stat, print_success};

pub fn cmd_check(path: &Path, unify: bool, format: OutputFormat) -> Result<()> {
  let mut config = UpgradeConfig::from_env();
  config.unify_config_enabled |= unify;

  let report = detect(Some(path), &config);
  let settings = ProjectSettings::load(&ProjectLayout::new(path)).context("Failed to load project settings")?;

  if format.is_json() {
    return print_json(&serde_json::json!({
      "project": path.display().to_string(),
      "needs_upgrade": report.needs_consolidation(),
      "conditions": report,
      "capabilities": {
        "tab": settings.has_tab(),
        "bot": settings.has_bot(),
        "function": settings.has_function(),
        "aad": settings.has_aad(),
        "spfx": settings.is_spfx(),
      },
    }));
  }

  if report.needs_consolidation() {
    print_info(&format!("{} needs an upgrade. Run 'teamsfx upgrade'.", path.display()));
  } else {
    print_success(&format!("{} does not need an upgrade.", path.display()));
  }
  print_stat("Unified config enabled", check_mark(report.feature_enabled));
  print_stat("Legacy .fx folder", check_mark(report.legacy_folder_exists));
  print_stat("Unified manifest missing", check_mark(!report.unified_manifest_exists));
  if report.legacy_folder_exists {
    print_stat("Tab", check_mark(settings.has_tab()));
    print_stat("Bot", check_mark(settings.has_bot()));
    print_stat("Azure Functions", check_mark(settings.has_function()));
    print_stat("AAD app", check_mark(settings.has_aad()));
    print_stat("SharePoint Framework", check_mark(settings.is_spfx()));
  }

  Ok(())
}
