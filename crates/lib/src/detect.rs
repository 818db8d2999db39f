//! Legacy layout detection.
//!
//! A project needs consolidation when the unified config feature is on, the
//! legacy `.fx` folder exists and no unified manifest template has been
//! written yet. Detection only inspects the filesystem.

use std::path::Path;

use serde::Serialize;

use crate::config::UpgradeConfig;
use crate::layout::ProjectLayout;

/// Each condition checked by the detector, for callers that want to explain
/// a negative answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DetectReport {
  pub feature_enabled: bool,
  pub project_path_present: bool,
  pub legacy_folder_exists: bool,
  pub unified_manifest_exists: bool,
}

impl DetectReport {
  pub fn needs_consolidation(&self) -> bool {
    self.feature_enabled && self.project_path_present && self.legacy_folder_exists && !self.unified_manifest_exists
  }
}

/// Evaluate every detection condition.
pub fn detect(project_path: Option<&Path>, config: &UpgradeConfig) -> DetectReport {
  let mut report = DetectReport {
    feature_enabled: config.unify_config_enabled,
    ..DetectReport::default()
  };

  let Some(project_path) = project_path else {
    return report;
  };
  report.project_path_present = true;

  let layout = ProjectLayout::new(project_path);
  report.legacy_folder_exists = layout.fx_dir().is_dir();
  report.unified_manifest_exists = layout.unified_manifest().exists();
  report
}

/// Whether the project still uses the split local/remote layout.
pub fn need_consolidate_local_remote(project_path: Option<&Path>, config: &UpgradeConfig) -> bool {
  detect(project_path, config).needs_consolidation()
}
