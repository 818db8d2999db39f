//! Implementation of the `teamsfx upgrade` command.
//!
//! Runs detection, asks for consent on the terminal and consolidates the
//! project's local and remote config.

use std::path::Path;

use anyhow::{Context, Result, bail};
use teamsfx_lib::config::{Platform, UpgradeConfig};
use teamsfx_lib::consent::cancel_guidance;
use teamsfx_lib::telemetry::TracingTelemetry;
use teamsfx_lib::upgrade::{ProjectUpgrader, UpgradeError, UpgradeInputs, UpgradeOutcome};

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, print_warning, symbols};
use crate::prompts::{TerminalInteraction, ensure_interactive};

pub struct UpgradeArgs {
  pub yes: bool,
  pub unify: bool,
  pub platform: Option<Platform>,
  pub operation: Option<String>,
}

pub fn cmd_upgrade(path: &Path, args: &UpgradeArgs, format: OutputFormat) -> Result<()> {
  let mut config = UpgradeConfig::from_env();
  config.unify_config_enabled |= args.unify;
  if let Some(platform) = args.platform {
    config.platform = platform;
  }

  let project = dunce::canonicalize(path).with_context(|| format!("Project not found: {}", path.display()))?;

  let ui = TerminalInteraction::new(args.yes);
  let telemetry = TracingTelemetry;
  let mut upgrader = ProjectUpgrader::new(&config, &ui, &telemetry);
  let mut inputs = UpgradeInputs::new(&project);
  inputs.operation = args.operation.clone();

  // Only prompt when there is something to upgrade.
  if teamsfx_lib::detect::need_consolidate_local_remote(Some(&project), &config) {
    ensure_interactive(args.yes)?;
  }

  let outcome = match upgrader.run(&inputs) {
    Ok(outcome) => outcome,
    Err(UpgradeError::Canceled) => {
      print_warning(cancel_guidance(config.platform));
      bail!("Upgrade canceled");
    }
    Err(e) => return Err(e).context("Upgrade failed"),
  };

  if format.is_json() {
    let json = match &outcome {
      UpgradeOutcome::NotNeeded => serde_json::json!({ "status": "not_needed" }),
      UpgradeOutcome::Skipped => serde_json::json!({ "status": "skipped" }),
      UpgradeOutcome::Upgraded(report) => serde_json::json!({ "status": "upgraded", "report": report }),
    };
    return print_json(&json);
  }

  match outcome {
    UpgradeOutcome::NotNeeded => print_info("Project does not need an upgrade."),
    UpgradeOutcome::Skipped => print_info("Upgrade prompt already shown for this session; skipped."),
    UpgradeOutcome::Upgraded(report) => {
      println!();
      print_success("Upgrade complete!");
      for path in &report.created {
        println!("  {} {}", symbols::ADD, path.display());
      }
      for moved in &report.moved {
        println!("{}", moved_line(moved));
      }
      if report.manifests_diverged {
        print_warning("Local and remote manifest templates differed; review manifest.template.json.");
      }
      if let Some(report_path) = &report.report_path {
        print_stat("Change log", &report_path.display().to_string());
      }
    }
  }

  Ok(())
}

/// One backed-up file: `<path> → .backup/<path>`.
fn moved_line(moved: &str) -> String {
  format!("  {} {} .backup/{}", moved, symbols::ARROW, moved)
}
