//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

pub const LOCAL_SETTINGS: &str = ".fx/configs/localSettings.json";
pub const PROJECT_SETTINGS: &str = ".fx/configs/projectSettings.json";
pub const LOCAL_ENV_CONFIG: &str = ".fx/configs/config.local.json";
pub const LOCAL_MANIFEST: &str = "templates/appPackage/manifest.local.template.json";
pub const REMOTE_MANIFEST: &str = "templates/appPackage/manifest.remote.template.json";
pub const UNIFIED_MANIFEST: &str = "templates/appPackage/manifest.template.json";

/// Isolated legacy project.
///
/// Each test gets its own temporary project root.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create an empty project directory.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// A tab project with local settings and both manifest templates.
  pub fn tab_project() -> Self {
    let env = Self::empty();
    env.write_file(PROJECT_SETTINGS, &fixture_content("project_settings_tab.json"));
    env.write_file(LOCAL_SETTINGS, r#"{ "frontend": { "browser": "none" } }"#);
    env.write_file(LOCAL_MANIFEST, &fixture_content("manifest_local.json"));
    env.write_file(REMOTE_MANIFEST, &fixture_content("manifest_remote.json"));
    env
  }

  /// A SharePoint Framework project with only a remote template.
  pub fn spfx_project() -> Self {
    let env = Self::empty();
    env.write_file(PROJECT_SETTINGS, &fixture_content("project_settings_spfx.json"));
    env.write_file(REMOTE_MANIFEST, &fixture_content("manifest_remote_spfx.json"));
    env
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.temp.path().join(relative_path)
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.path(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    let path = self.path(relative_path);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
  }

  pub fn exists(&self, relative_path: &str) -> bool {
    self.path(relative_path).exists()
  }

  /// Get a Command for the teamsfx binary with the unified config feature
  /// switched on.
  pub fn teamsfx_cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("teamsfx");
    cmd
      .current_dir(self.root())
      .env("TEAMSFX_CONFIG_UNIFY", "true")
      .env_remove("TEAMSFX_PLATFORM")
      .env_remove("RUST_LOG");
    cmd
  }
}
