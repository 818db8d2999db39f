//! Consolidate a split local/remote project into the unified layout.
//!
//! Steps, in order:
//!
//! 1. Write `.fx/configs/config.local.json` for the local environment
//! 2. Create `manifest.template.json` from the remote template (SPFx projects
//!    get their tab URLs rewritten, everything else is copied verbatim)
//! 3. Move `localSettings.json` into `.backup`
//! 4. Warn if the local and remote templates differ
//! 5. Move the local template into `.backup`
//! 6. Move the remote template into `.backup`
//!
//! Any failure in 1-6 undoes the committed steps and returns the original
//! error. After success a change report is written into `.backup` and the
//! local-only files are added to `.gitignore`.

pub mod spfx;
pub mod transaction;

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Platform;
use crate::consent::{Severity, UserInteraction};
use crate::ignore::add_path_to_ignore;
use crate::layout::{ProjectLayout, local_ignore_entries};
use crate::manifest_diff::compare_manifest_files;
use crate::project::{LocalEnvConfig, ProjectSettings};
use crate::report::{ChangeReport, REPORT_FILE};
use crate::telemetry::{Properties, Telemetry, events, properties, props};

pub use transaction::{Committed, JournalEntry, RollbackFailure, Transaction};

/// Errors that abort the consolidation. The project has been rolled back
/// when one of these is returned.
#[derive(Debug, Error)]
pub enum ConsolidateError {
  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    source: io::Error,
  },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },

  #[error("invalid manifest template {}: {source}", path.display())]
  Manifest { path: PathBuf, source: serde_json::Error },

  #[error("failed to serialize {what}: {source}")]
  Serialize {
    what: &'static str,
    source: serde_json::Error,
  },
}

/// Everything the transformer needs from its caller.
pub struct ConsolidateContext<'a> {
  pub layout: &'a ProjectLayout,
  pub settings: &'a ProjectSettings,
  pub platform: Platform,
  pub guide_url: &'a str,
  pub ui: &'a dyn UserInteraction,
  pub telemetry: &'a dyn Telemetry,
}

impl ConsolidateContext<'_> {
  fn props(&self) -> Properties {
    properties([
      (props::PLATFORM, self.platform.as_str()),
      (props::SPFX, if self.settings.is_spfx() { "true" } else { "false" }),
    ])
  }

  fn send(&self, event: &str) {
    self.telemetry.send_event(event, &self.props());
  }

  fn send_with_file(&self, event: &str, file: &str) {
    let mut fields = self.props();
    fields.insert(props::FILE.to_string(), file.to_string());
    self.telemetry.send_event(event, &fields);
  }
}

/// Outcome of a successful consolidation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidateReport {
  /// Files written by the upgrade.
  pub created: Vec<PathBuf>,
  /// Files moved into `.backup`, relative to the project root.
  pub moved: Vec<String>,
  pub manifests_diverged: bool,
  /// Change report location, if it could be written.
  pub report_path: Option<PathBuf>,
  /// Entries newly added to the ignore file.
  pub ignore_entries: Vec<String>,
}

/// Run the consolidation against a legacy project.
pub fn consolidate_local_remote(ctx: &ConsolidateContext<'_>) -> Result<ConsolidateReport, ConsolidateError> {
  info!(project = %ctx.layout.root().display(), spfx = ctx.settings.is_spfx(), "consolidating local and remote config");

  let mut tx = Transaction::begin(ctx.layout);
  let manifests_diverged = match run_steps(ctx, &mut tx) {
    Ok(diverged) => diverged,
    Err(err) => {
      error!(error = %err, "consolidation failed");
      for failure in tx.rollback() {
        ctx.telemetry.send_error_event(events::ROLLBACK_ERROR, &failure);
      }
      return Err(err);
    }
  };

  Ok(finalize(ctx, tx.commit(), manifests_diverged))
}

/// Steps 1-6. Returns whether the local and remote templates diverged.
fn run_steps(ctx: &ConsolidateContext<'_>, tx: &mut Transaction<'_>) -> Result<bool, ConsolidateError> {
  let layout = ctx.layout;

  let env_config = LocalEnvConfig::for_app(&ctx.settings.app_name)
    .to_json()
    .map_err(|source| ConsolidateError::Serialize {
      what: "local env config",
      source,
    })?;
  tx.write_file(&layout.local_env_config(), env_config.as_bytes())?;
  ctx.send(events::ADD_LOCAL_ENV);

  let remote = layout.remote_manifest();
  let remote_exists = remote.is_file();
  if remote_exists {
    let unified = layout.unified_manifest();
    if ctx.settings.is_spfx() {
      let manifest = spfx::render_unified_manifest(&remote)?;
      tx.write_file(&unified, manifest.as_bytes())?;
      ctx.send(events::ADD_SPFX_MANIFEST);
    } else {
      tx.copy_file(&remote, &unified)?;
      ctx.send(events::COPY_AZURE_MANIFEST);
    }
  }

  let local_settings = layout.local_settings();
  if local_settings.is_file() {
    let moved = tx.move_to_backup(&local_settings)?;
    ctx.send_with_file(events::BACKUP_CONFIG, &moved);
  }

  let local = layout.local_manifest();
  let local_exists = local.is_file();
  let mut diverged = false;
  if local_exists && remote_exists {
    match compare_manifest_files(&local, &remote) {
      Ok(true) => {}
      Ok(false) => {
        diverged = true;
        warn!("local manifest template differs from the remote template");
        ctx.ui.show_message(Severity::Warning, divergence_message(), false, &[]);
      }
      Err(err) => {
        warn!(error = %err, "could not compare manifest templates");
        ctx.telemetry.send_error_event(events::CHECK_MANIFEST_ERROR, &err);
      }
    }
  }

  if local_exists {
    let moved = tx.move_to_backup(&local)?;
    ctx.send_with_file(events::BACKUP_MANIFEST, &moved);
  }

  if remote_exists {
    let moved = tx.move_to_backup(&remote)?;
    ctx.send_with_file(events::BACKUP_MANIFEST, &moved);
  }

  Ok(diverged)
}

/// Step 8: report, ignore entries and the completion message. Nothing here
/// fails the upgrade.
fn finalize(ctx: &ConsolidateContext<'_>, committed: Committed, manifests_diverged: bool) -> ConsolidateReport {
  let layout = ctx.layout;

  let change_report = ChangeReport {
    added: committed.created.iter().map(|p| layout.relative_display(p)).collect(),
    moved: committed.moved.clone(),
    manifests_diverged,
    guide_url: ctx.guide_url.to_string(),
  };
  let report_path = layout.backup_dir().join(REPORT_FILE);
  let report_path = match change_report.write(&report_path) {
    Ok(()) => Some(report_path),
    Err(err) => {
      warn!(path = %report_path.display(), error = %err, "failed to write upgrade report");
      ctx.telemetry.send_error_event(events::REPORT_ERROR, &err);
      None
    }
  };

  let ignore_file = layout.ignore_file();
  let mut ignore_entries = Vec::new();
  for entry in local_ignore_entries() {
    match add_path_to_ignore(&ignore_file, &entry) {
      Ok(true) => ignore_entries.push(entry),
      Ok(false) => {}
      Err(err) => {
        warn!(entry = %entry, error = %err, "failed to update ignore file");
        ctx.telemetry.send_error_event(events::IGNORE_ERROR, &err);
      }
    }
  }

  let message = completion_message(ctx.platform, &committed.moved);
  info!("{message}");
  ctx.ui.show_message(Severity::Info, &message, false, &[]);
  if ctx.platform == Platform::VsCode
    && let Some(path) = &report_path
  {
    ctx.ui.open_file(path);
  }

  ConsolidateReport {
    created: committed.created,
    moved: committed.moved,
    manifests_diverged,
    report_path,
    ignore_entries,
  }
}

fn divergence_message() -> &'static str {
  "manifest.local.template.json differs from manifest.remote.template.json. The new manifest.template.json is \
   based on the remote template; review it and carry over any local-only changes from .backup."
}

fn completion_message(platform: Platform, moved: &[String]) -> String {
  let moved = if moved.is_empty() {
    "No files were moved.".to_string()
  } else {
    format!("Moved to .backup: {}.", moved.join(", "))
  };
  match platform {
    Platform::VsCode => format!(
      "Your project now uses templates/appPackage/manifest.template.json and .fx/configs/config.local.json. \
       {moved} See .backup/{REPORT_FILE} for details."
    ),
    Platform::Cli => format!(
      "Project upgraded. Manifest: templates/appPackage/manifest.template.json, local config: \
       .fx/configs/config.local.json. {moved} Change log: .backup/{REPORT_FILE}"
    ),
  }
}
