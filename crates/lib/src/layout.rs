//! Fixed on-disk layout of a Teams Toolkit project.
//!
//! ```text
//! <project>/
//! ├── .fx/
//! │   ├── configs/
//! │   │   ├── projectSettings.json
//! │   │   ├── localSettings.json        # legacy, moved to .backup
//! │   │   └── config.local.json         # written by the upgrade
//! │   └── states/
//! ├── templates/appPackage/
//! │   ├── manifest.template.json        # unified, written by the upgrade
//! │   ├── manifest.local.template.json  # legacy, moved to .backup
//! │   └── manifest.remote.template.json # legacy, moved to .backup
//! ├── .backup/
//! └── .gitignore
//! ```

use std::io;
use std::path::{Component, Path, PathBuf};

/// Hidden per-project folder marking the legacy layout.
pub const FX_DIR: &str = ".fx";
pub const CONFIGS_DIR: &str = "configs";
pub const STATES_DIR: &str = "states";
pub const PROJECT_SETTINGS_FILE: &str = "projectSettings.json";
pub const LOCAL_SETTINGS_FILE: &str = "localSettings.json";
pub const LOCAL_ENV_CONFIG_FILE: &str = "config.local.json";
pub const LOCAL_ENV_STATE_FILE: &str = "state.local.json";

pub const TEMPLATES_DIR: &str = "templates";
pub const APP_PACKAGE_DIR: &str = "appPackage";
pub const UNIFIED_MANIFEST_FILE: &str = "manifest.template.json";
pub const REMOTE_MANIFEST_FILE: &str = "manifest.remote.template.json";
pub const LOCAL_MANIFEST_FILE: &str = "manifest.local.template.json";

pub const BACKUP_DIR: &str = ".backup";
pub const IGNORE_FILE: &str = ".gitignore";

/// Resolves every path the upgrade reads or writes for one project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
  root: PathBuf,
}

impl ProjectLayout {
  /// Use `root` as given, without touching the filesystem.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Canonicalize `root` so relative paths and symlinks resolve consistently.
  pub fn resolve(root: &Path) -> io::Result<Self> {
    Ok(Self::new(dunce::canonicalize(root)?))
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn fx_dir(&self) -> PathBuf {
    self.root.join(FX_DIR)
  }

  pub fn configs_dir(&self) -> PathBuf {
    self.fx_dir().join(CONFIGS_DIR)
  }

  pub fn project_settings(&self) -> PathBuf {
    self.configs_dir().join(PROJECT_SETTINGS_FILE)
  }

  pub fn local_settings(&self) -> PathBuf {
    self.configs_dir().join(LOCAL_SETTINGS_FILE)
  }

  pub fn local_env_config(&self) -> PathBuf {
    self.configs_dir().join(LOCAL_ENV_CONFIG_FILE)
  }

  pub fn app_package_dir(&self) -> PathBuf {
    self.root.join(TEMPLATES_DIR).join(APP_PACKAGE_DIR)
  }

  pub fn unified_manifest(&self) -> PathBuf {
    self.app_package_dir().join(UNIFIED_MANIFEST_FILE)
  }

  pub fn remote_manifest(&self) -> PathBuf {
    self.app_package_dir().join(REMOTE_MANIFEST_FILE)
  }

  pub fn local_manifest(&self) -> PathBuf {
    self.app_package_dir().join(LOCAL_MANIFEST_FILE)
  }

  pub fn backup_dir(&self) -> PathBuf {
    self.root.join(BACKUP_DIR)
  }

  pub fn ignore_file(&self) -> PathBuf {
    self.root.join(IGNORE_FILE)
  }

  /// Path of `path` relative to the project root.
  ///
  /// Paths outside the project fall back to their file name so a backup can
  /// never escape the backup folder.
  pub fn relative(&self, path: &Path) -> PathBuf {
    match path.strip_prefix(&self.root) {
      Ok(rel) => rel.to_path_buf(),
      Err(_) => path.file_name().map(PathBuf::from).unwrap_or_default(),
    }
  }

  /// Relative path rendered with `/` separators, as written to reports and
  /// ignore files.
  pub fn relative_display(&self, path: &Path) -> String {
    to_slash(&self.relative(path))
  }

  /// Location inside `.backup` that mirrors `original`.
  pub fn backup_path_for(&self, original: &Path) -> PathBuf {
    self.backup_dir().join(self.relative(original))
  }
}

/// Ignore-file entries for the local-only config and state files plus the
/// backup folder itself.
pub fn local_ignore_entries() -> Vec<String> {
  vec![
    format!("{FX_DIR}/{CONFIGS_DIR}/{LOCAL_ENV_CONFIG_FILE}"),
    format!("{FX_DIR}/{STATES_DIR}/{LOCAL_ENV_STATE_FILE}"),
    format!("{BACKUP_DIR}/"),
  ]
}

fn to_slash(path: &Path) -> String {
  path
    .components()
    .filter_map(|c| match c {
      Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
      _ => None,
    })
    .collect::<Vec<_>>()
    .join("/")
}
