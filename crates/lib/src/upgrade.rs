//! Entry point hosts call before running a project operation.
//!
//! Checks whether the project needs consolidation, asks for consent and runs
//! the transformer. Cancellation leaves the project untouched.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::UpgradeConfig;
use crate::consent::{Consent, ConsentGuard, GateDecision, UserInteraction, ask_for_upgrade, cancel_guidance};
use crate::consolidate::{ConsolidateContext, ConsolidateError, ConsolidateReport, consolidate_local_remote};
use crate::detect::need_consolidate_local_remote;
use crate::layout::ProjectLayout;
use crate::project::{ProjectError, ProjectSettings};
use crate::telemetry::{Telemetry, events, properties, props};

#[derive(Debug, Error)]
pub enum UpgradeError {
  /// The user declined the upgrade. Expected; not a failure of the tool.
  #[error("project upgrade canceled by user")]
  Canceled,

  #[error("failed to resolve project path {}: {source}", path.display())]
  ProjectPath { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Project(#[from] ProjectError),

  #[error(transparent)]
  Consolidate(#[from] ConsolidateError),
}

impl UpgradeError {
  pub fn is_canceled(&self) -> bool {
    matches!(self, UpgradeError::Canceled)
  }
}

/// What happened to the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
  /// Already on the unified layout, or the feature is off.
  NotNeeded,
  /// A background operation already raised the prompt this session.
  Skipped,
  Upgraded(ConsolidateReport),
}

/// One intercepted host operation.
#[derive(Debug, Clone, Default)]
pub struct UpgradeInputs {
  pub project_path: Option<PathBuf>,
  /// Name of the host operation that triggered the check.
  pub operation: Option<String>,
}

impl UpgradeInputs {
  pub fn new(project_path: impl Into<PathBuf>) -> Self {
    Self {
      project_path: Some(project_path.into()),
      operation: None,
    }
  }

  pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
    self.operation = Some(operation.into());
    self
  }
}

/// Upgrade driver for one host session.
///
/// Holds the session's [`ConsentGuard`], so reuse one upgrader across the
/// operations of a session instead of creating one per call.
pub struct ProjectUpgrader<'a> {
  config: &'a UpgradeConfig,
  ui: &'a dyn UserInteraction,
  telemetry: &'a dyn Telemetry,
  guard: ConsentGuard,
}

impl<'a> ProjectUpgrader<'a> {
  pub fn new(config: &'a UpgradeConfig, ui: &'a dyn UserInteraction, telemetry: &'a dyn Telemetry) -> Self {
    Self {
      config,
      ui,
      telemetry,
      guard: ConsentGuard::new(),
    }
  }

  pub fn run(&mut self, inputs: &UpgradeInputs) -> Result<UpgradeOutcome, UpgradeError> {
    let project_path = inputs.project_path.as_deref();
    if !need_consolidate_local_remote(project_path, self.config) {
      debug!("project does not need consolidation");
      return Ok(UpgradeOutcome::NotNeeded);
    }
    let Some(project_path) = project_path else {
      return Ok(UpgradeOutcome::NotNeeded);
    };

    let operation = inputs.operation.as_deref();
    let modal = match self.guard.check(self.config.platform, operation) {
      GateDecision::Skip => return Ok(UpgradeOutcome::Skipped),
      GateDecision::Prompt { modal } => modal,
    };

    let platform = self.config.platform.as_str();
    let modal_str = if modal { "true" } else { "false" };
    self.telemetry.send_event(
      events::NOTIFICATION,
      &properties([
        (props::PLATFORM, platform),
        (props::OPERATION, operation.unwrap_or("")),
        (props::MODAL, modal_str),
      ]),
    );

    if ask_for_upgrade(self.ui, self.telemetry, self.config, modal) == Consent::Canceled {
      self
        .telemetry
        .send_event(events::CANCEL, &properties([(props::PLATFORM, platform)]));
      info!("{}", cancel_guidance(self.config.platform));
      return Err(UpgradeError::Canceled);
    }

    self
      .telemetry
      .send_event(events::UPGRADE_START, &properties([(props::PLATFORM, platform)]));
    match self.consolidate(project_path) {
      Ok(report) => {
        info!(moved = report.moved.len(), "project upgraded");
        self.telemetry.send_event(
          events::UPGRADE,
          &properties([
            (props::PLATFORM, platform),
            (
              props::MANIFESTS_DIVERGED,
              if report.manifests_diverged { "true" } else { "false" },
            ),
          ]),
        );
        Ok(UpgradeOutcome::Upgraded(report))
      }
      Err(err) => {
        self.telemetry.send_error_event(events::ERROR, &err);
        Err(err)
      }
    }
  }

  fn consolidate(&self, project_path: &Path) -> Result<ConsolidateReport, UpgradeError> {
    let layout = ProjectLayout::resolve(project_path).map_err(|source| UpgradeError::ProjectPath {
      path: project_path.to_path_buf(),
      source,
    })?;
    let settings = ProjectSettings::load(&layout)?;
    let ctx = ConsolidateContext {
      layout: &layout,
      settings: &settings,
      platform: self.config.platform,
      guide_url: &self.config.guide_url,
      ui: self.ui,
      telemetry: self.telemetry,
    };
    Ok(consolidate_local_remote(&ctx)?)
  }
}
