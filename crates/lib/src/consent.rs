//! User consent before upgrading a project.
//!
//! The upgrade rewrites and moves project files, so it only runs after the
//! user picks "Upgrade". "Learn More" opens the guide and asks again; any
//! other answer cancels. There is no timeout.

use std::path::Path;

use tracing::debug;

use crate::config::{Platform, UpgradeConfig};
use crate::telemetry::{Telemetry, events, properties, props};

pub const UPGRADE_ACTION: &str = "Upgrade";
pub const LEARN_MORE_ACTION: &str = "Learn More";

/// Operations a host may run in the background, where a modal dialog would
/// interrupt the user.
pub const SILENT_OPERATIONS: &[&str] = &["getProjectConfig", "checkPermission"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Info,
  Warning,
  Error,
}

/// How the host talks to the user.
pub trait UserInteraction {
  /// Show `text` with the given actions and return the one chosen, if any.
  fn show_message(&self, severity: Severity, text: &str, modal: bool, actions: &[&str]) -> Option<String>;

  fn open_url(&self, url: &str);

  /// Open a local file for the user. Hosts without an editor ignore this.
  fn open_file(&self, _path: &Path) {}
}

/// The user's answer to the upgrade prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
  Upgrade,
  Canceled,
}

/// Whether to show the prompt for an intercepted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
  Prompt { modal: bool },
  /// A background operation already raised the prompt; let this one through
  /// without upgrading.
  Skip,
}

pub fn is_silent_operation(operation: &str) -> bool {
  SILENT_OPERATIONS.contains(&operation)
}

/// Per-session single-flight latch for background operations.
///
/// Once a silent operation has raised the prompt, further silent operations
/// skip it until a regular operation comes through. This is best-effort; it
/// does not serialize concurrent callers.
#[derive(Debug, Default)]
pub struct ConsentGuard {
  silent_prompt_raised: bool,
}

impl ConsentGuard {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn check(&mut self, platform: Platform, operation: Option<&str>) -> GateDecision {
    let silent = operation.is_some_and(is_silent_operation);
    if silent && self.silent_prompt_raised {
      debug!(operation, "upgrade prompt already raised by a background operation");
      return GateDecision::Skip;
    }
    self.silent_prompt_raised = silent;

    let modal = match platform {
      Platform::Cli => true,
      Platform::VsCode => !silent,
    };
    GateDecision::Prompt { modal }
  }
}

/// Ask until the user upgrades or dismisses the prompt.
pub fn ask_for_upgrade(
  ui: &dyn UserInteraction,
  telemetry: &dyn Telemetry,
  config: &UpgradeConfig,
  modal: bool,
) -> Consent {
  let message = upgrade_message(config.platform);
  loop {
    let answer = ui.show_message(
      Severity::Warning,
      message,
      modal,
      &[UPGRADE_ACTION, LEARN_MORE_ACTION],
    );
    match answer.as_deref() {
      Some(UPGRADE_ACTION) => return Consent::Upgrade,
      Some(LEARN_MORE_ACTION) => {
        telemetry.send_event(events::GUIDE, &properties([(props::PLATFORM, config.platform.as_str())]));
        ui.open_url(&config.guide_url);
      }
      _ => return Consent::Canceled,
    }
  }
}

pub fn upgrade_message(platform: Platform) -> &'static str {
  match platform {
    Platform::VsCode => {
      "This version of Teams Toolkit uses a single manifest template and a local environment config. \
       Upgrade the project to keep working with it. Replaced files are moved to the .backup folder."
    }
    Platform::Cli => {
      "This version of TeamsFx CLI uses a single manifest template and a local environment config. \
       Upgrade the project to keep working with it. Replaced files are moved to the .backup folder."
    }
  }
}

/// Printed when the user declines, pointing at the last compatible release.
pub fn cancel_guidance(platform: Platform) -> &'static str {
  match platform {
    Platform::VsCode => {
      "The project was not upgraded. To keep using it without upgrading, install Teams Toolkit 3.x or earlier."
    }
    Platform::Cli => {
      "The project was not upgraded. To keep using it without upgrading, install TeamsFx CLI 0.x or earlier \
       with `npm install -g @microsoft/teamsfx-cli@0.x`."
    }
  }
}
