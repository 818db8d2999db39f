//! Project settings and the generated local environment config.
//!
//! Settings are read from `.fx/configs/projectSettings.json` and never
//! written back. The local env config is the record the upgrade creates as
//! `.fx/configs/config.local.json`.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::layout::ProjectLayout;

pub const ENV_CONFIG_SCHEMA: &str = "https://aka.ms/teamsfx-env-config-schema";
const ENV_CONFIG_DESCRIPTION: &str = "You can customize the TeamsFx config for different environments. \
  Visit https://aka.ms/teamsfx-env-config to learn more about this.";

const LOCAL_NAME_SUFFIX: &str = "-local-debug";
/// Teams caps the short app name at 30 characters.
const MAX_SHORT_NAME_LEN: usize = 30;

const HOST_TYPE_SPFX: &str = "SPFx";
const CAPABILITY_TAB: &str = "Tab";
const CAPABILITY_BOT: &str = "Bot";
const CAPABILITY_MESSAGE_EXTENSION: &str = "MessagingExtension";
const RESOURCE_FUNCTION: &str = "function";
const PLUGIN_AAD: &str = "fx-resource-aad-app-for-teams";

/// Errors that can occur when loading project settings.
#[derive(Debug, Error)]
pub enum ProjectError {
  #[error("failed to read project settings {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse project settings {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },
}

/// Read-only view of `projectSettings.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
  pub app_name: String,
  pub programming_language: Option<String>,
  pub solution_settings: SolutionSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolutionSettings {
  pub host_type: Option<String>,
  pub capabilities: Vec<String>,
  pub azure_resources: Vec<String>,
  pub active_resource_plugins: Vec<String>,
}

impl ProjectSettings {
  /// Load settings for a project.
  ///
  /// A project without a settings file gets the defaults: no name and no
  /// capabilities.
  pub fn load(layout: &ProjectLayout) -> Result<Self, ProjectError> {
    let path = layout.project_settings();
    let content = match fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no project settings, using defaults");
        return Ok(Self::default());
      }
      Err(source) => return Err(ProjectError::Read { path, source }),
    };
    serde_json::from_str(&content).map_err(|source| ProjectError::Parse { path, source })
  }

  pub fn has_tab(&self) -> bool {
    self.has_capability(CAPABILITY_TAB)
  }

  pub fn has_bot(&self) -> bool {
    self.has_capability(CAPABILITY_BOT) || self.has_capability(CAPABILITY_MESSAGE_EXTENSION)
  }

  pub fn has_function(&self) -> bool {
    self.solution_settings.azure_resources.iter().any(|r| r == RESOURCE_FUNCTION)
  }

  pub fn has_aad(&self) -> bool {
    self.solution_settings.active_resource_plugins.iter().any(|p| p == PLUGIN_AAD)
  }

  /// SharePoint Framework projects host their tabs in SharePoint and need
  /// their tab URLs rewritten during the upgrade.
  pub fn is_spfx(&self) -> bool {
    self.solution_settings.host_type.as_deref() == Some(HOST_TYPE_SPFX)
  }

  fn has_capability(&self, name: &str) -> bool {
    self.solution_settings.capabilities.iter().any(|c| c == name)
  }
}

/// Content of the generated `config.local.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalEnvConfig {
  #[serde(rename = "$schema")]
  pub schema: String,
  pub description: String,
  pub manifest: ManifestConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestConfig {
  #[serde(rename = "appName")]
  pub app_name: AppName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppName {
  pub short: String,
  pub full: String,
}

impl LocalEnvConfig {
  pub fn for_app(app_name: &str) -> Self {
    let name = local_app_name(app_name);
    Self {
      schema: ENV_CONFIG_SCHEMA.to_string(),
      description: ENV_CONFIG_DESCRIPTION.to_string(),
      manifest: ManifestConfig {
        app_name: AppName {
          short: name.clone(),
          full: name,
        },
      },
    }
  }

  /// Pretty JSON with a trailing newline, as written to disk.
  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(self)?;
    out.push('\n');
    Ok(out)
  }
}

/// Name shown for the local debug copy of the app.
///
/// Control characters are dropped and the base name is cut so the suffixed
/// result stays within the short-name limit.
pub fn local_app_name(app_name: &str) -> String {
  let clean: String = app_name.trim().chars().filter(|c| !c.is_control()).collect();
  if clean.is_empty() {
    return LOCAL_NAME_SUFFIX.trim_start_matches('-').to_string();
  }
  let budget = MAX_SHORT_NAME_LEN - LOCAL_NAME_SUFFIX.len();
  let base: String = clean.chars().take(budget).collect();
  format!("{}{}", base.trim_end(), LOCAL_NAME_SUFFIX)
}
