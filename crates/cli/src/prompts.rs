//! Terminal-backed host collaborators.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use anyhow::{Result, bail};
use teamsfx_lib::consent::{Severity, UPGRADE_ACTION, UserInteraction};
use tracing::warn;

use crate::output::{print_message, symbols};

/// Fail early when a prompt could not be answered.
pub fn ensure_interactive(force: bool) -> Result<()> {
  if force {
    return Ok(());
  }

  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!("Cannot prompt for confirmation in non-interactive mode. Use --yes to proceed.");
  }
  Ok(())
}

/// Answers prompts on stdin, or picks "Upgrade" when `assume_yes` is set.
pub struct TerminalInteraction {
  assume_yes: bool,
}

impl TerminalInteraction {
  pub fn new(assume_yes: bool) -> Self {
    Self { assume_yes }
  }
}

impl UserInteraction for TerminalInteraction {
  fn show_message(&self, severity: Severity, text: &str, _modal: bool, actions: &[&str]) -> Option<String> {
    print_message(severity, text);
    if actions.is_empty() {
      return None;
    }
    if self.assume_yes && actions.contains(&UPGRADE_ACTION) {
      return Some(UPGRADE_ACTION.to_string());
    }

    let choices: Vec<String> = actions
      .iter()
      .enumerate()
      .map(|(i, action)| format!("[{}] {}", i + 1, action))
      .collect();
    let mut stderr = io::stderr();
    if write!(stderr, "{} (anything else cancels) ", choices.join("  ")).is_err() || stderr.flush().is_err() {
      return None;
    }

    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
      warn!(error = %e, "failed to read answer");
      return None;
    }
    pick_action(input.trim(), actions).map(str::to_string)
  }

  fn open_url(&self, url: &str) {
    eprintln!("  {} Open {} in your browser to learn more.", symbols::ARROW, url);
  }

  fn open_file(&self, path: &Path) {
    eprintln!("  {} {}", symbols::ARROW, path.display());
  }
}

/// Match a typed answer by 1-based index or case-insensitive action name.
fn pick_action<'a>(answer: &str, actions: &[&'a str]) -> Option<&'a str> {
  if let Ok(index) = answer.parse::<usize>() {
    return index.checked_sub(1).and_then(|i| actions.get(i)).copied();
  }
  actions.iter().copied().find(|a| a.eq_ignore_ascii_case(answer))
}
