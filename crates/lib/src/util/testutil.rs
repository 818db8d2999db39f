//! Test utilities for teamsfx-lib.
//!
//! Scripted stand-ins for the host collaborators and a builder for legacy
//! project trees.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::consent::{Severity, UserInteraction};
use crate::layout::ProjectLayout;
use crate::telemetry::{Properties, Telemetry};

/// A message passed to [`UserInteraction::show_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownMessage {
  pub severity: Severity,
  pub text: String,
  pub modal: bool,
  pub actions: Vec<String>,
}

/// Answers prompts from a fixed script and records everything shown.
///
/// Messages without actions do not consume an answer. Once the script runs
/// out every prompt is dismissed.
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
  answers: RefCell<VecDeque<Option<String>>>,
  messages: RefCell<Vec<ShownMessage>>,
  urls: RefCell<Vec<String>>,
  files: RefCell<Vec<PathBuf>>,
}

impl ScriptedInteraction {
  pub fn new<'a>(answers: impl IntoIterator<Item = Option<&'a str>>) -> Self {
    Self {
      answers: RefCell::new(answers.into_iter().map(|a| a.map(str::to_string)).collect()),
      ..Self::default()
    }
  }

  pub fn messages(&self) -> Vec<ShownMessage> {
    self.messages.borrow().clone()
  }

  pub fn warnings(&self) -> Vec<ShownMessage> {
    self
      .messages()
      .into_iter()
      .filter(|m| m.severity == Severity::Warning && m.actions.is_empty())
      .collect()
  }

  pub fn opened_urls(&self) -> Vec<String> {
    self.urls.borrow().clone()
  }

  pub fn opened_files(&self) -> Vec<PathBuf> {
    self.files.borrow().clone()
  }
}

impl UserInteraction for ScriptedInteraction {
  fn show_message(&self, severity: Severity, text: &str, modal: bool, actions: &[&str]) -> Option<String> {
    self.messages.borrow_mut().push(ShownMessage {
      severity,
      text: text.to_string(),
      modal,
      actions: actions.iter().map(|a| a.to_string()).collect(),
    });
    if actions.is_empty() {
      return None;
    }
    self.answers.borrow_mut().pop_front().flatten()
  }

  fn open_url(&self, url: &str) {
    self.urls.borrow_mut().push(url.to_string());
  }

  fn open_file(&self, path: &Path) {
    self.files.borrow_mut().push(path.to_path_buf());
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
  pub name: String,
  pub properties: Properties,
}

/// Captures telemetry for assertions.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
  events: RefCell<Vec<RecordedEvent>>,
  errors: RefCell<Vec<(String, String)>>,
}

impl RecordingTelemetry {
  pub fn events(&self) -> Vec<RecordedEvent> {
    self.events.borrow().clone()
  }

  /// `(event name, error message)` pairs.
  pub fn errors(&self) -> Vec<(String, String)> {
    self.errors.borrow().clone()
  }

  pub fn count(&self, name: &str) -> usize {
    self.events.borrow().iter().filter(|e| e.name == name).count()
  }

  pub fn has_error(&self, name: &str) -> bool {
    self.errors.borrow().iter().any(|(n, _)| n == name)
  }
}

impl Telemetry for RecordingTelemetry {
  fn send_event(&self, name: &str, properties: &Properties) {
    self.events.borrow_mut().push(RecordedEvent {
      name: name.to_string(),
      properties: properties.clone(),
    });
  }

  fn send_error_event(&self, name: &str, error: &dyn Error) {
    self.errors.borrow_mut().push((name.to_string(), error.to_string()));
  }
}

/// A legacy project in a temporary directory.
pub struct LegacyProject {
  pub temp: TempDir,
  pub layout: ProjectLayout,
}

impl LegacyProject {
  /// Create `.fx/configs` with a project settings file.
  pub fn new(settings: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let layout = ProjectLayout::resolve(temp.path()).unwrap();
    let project = Self { temp, layout };
    project.write(&project.layout.project_settings(), settings);
    project
  }

  /// A plain tab project named `demo`.
  pub fn tab() -> Self {
    Self::new(r#"{ "appName": "demo", "solutionSettings": { "hostType": "Azure", "capabilities": ["Tab"] } }"#)
  }

  /// A SharePoint Framework tab project named `spfx-demo`.
  pub fn spfx() -> Self {
    Self::new(r#"{ "appName": "spfx-demo", "solutionSettings": { "hostType": "SPFx", "capabilities": ["Tab"] } }"#)
  }

  pub fn write(&self, path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
  }

  pub fn with_local_settings(self, content: &str) -> Self {
    self.write(&self.layout.local_settings(), content);
    self
  }

  pub fn with_local_manifest(self, content: &str) -> Self {
    self.write(&self.layout.local_manifest(), content);
    self
  }

  pub fn with_remote_manifest(self, content: &str) -> Self {
    self.write(&self.layout.remote_manifest(), content);
    self
  }

  pub fn read(&self, path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
  }

  pub fn backup_of(&self, original: &Path) -> PathBuf {
    self.layout.backup_path_for(original)
  }
}
