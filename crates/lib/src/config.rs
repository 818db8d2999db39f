//! Upgrade configuration.
//!
//! Values come from the environment by default; the CLI overrides them with
//! its own flags.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{GUIDE_URL, PLATFORM_ENV, UNIFY_CONFIG_ENV};

/// Host the upgrade runs in. Selects message wording and prompt modality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  VsCode,
  #[default]
  Cli,
}

impl Platform {
  pub fn as_str(self) -> &'static str {
    match self {
      Platform::VsCode => "vscode",
      Platform::Cli => "cli",
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
#[error("unknown platform '{0}', expected 'vscode' or 'cli'")]
pub struct ParsePlatformError(String);

impl FromStr for Platform {
  type Err = ParsePlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "vscode" | "vs-code" | "code" => Ok(Platform::VsCode),
      "cli" => Ok(Platform::Cli),
      _ => Err(ParsePlatformError(s.to_string())),
    }
  }
}

/// Options shared by detection, the consent prompt and the transformer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeConfig {
  pub platform: Platform,
  /// Feature flag gating the unified manifest/env config layout.
  pub unify_config_enabled: bool,
  /// Page opened by the "Learn More" action.
  pub guide_url: String,
}

impl Default for UpgradeConfig {
  fn default() -> Self {
    Self {
      platform: Platform::default(),
      unify_config_enabled: false,
      guide_url: GUIDE_URL.to_string(),
    }
  }
}

impl UpgradeConfig {
  /// Read `TEAMSFX_CONFIG_UNIFY` and `TEAMSFX_PLATFORM`.
  ///
  /// An unparseable platform falls back to the CLI wording.
  pub fn from_env() -> Self {
    let platform = env::var(PLATFORM_ENV)
      .ok()
      .and_then(|v| v.parse().ok())
      .unwrap_or_default();
    Self {
      platform,
      unify_config_enabled: env_flag(UNIFY_CONFIG_ENV),
      ..Self::default()
    }
  }
}

fn env_flag(var: &str) -> bool {
  env::var(var)
    .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"))
    .unwrap_or(false)
}
