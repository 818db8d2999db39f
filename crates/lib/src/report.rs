//! Markdown change report written into the backup folder.

use std::fs;
use std::io;
use std::path::Path;

/// File name of the report inside `.backup`.
pub const REPORT_FILE: &str = "upgrade-change-logs.md";

const REPORT_HEADER: &str = "# Teams Toolkit project upgrade

Your project now uses a single manifest template and a local environment
config instead of separate local and remote variants.
";

const DIVERGENCE_NOTE: &str = "## Manifest differences

`manifest.local.template.json` differed from `manifest.remote.template.json`.
The new `manifest.template.json` is based on the remote template. Compare it
with the backed up local template and carry over any local-only changes.
";

/// What changed during one upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
  /// Files written by the upgrade, relative to the project root.
  pub added: Vec<String>,
  /// Files moved into `.backup`, relative to the project root.
  pub moved: Vec<String>,
  pub manifests_diverged: bool,
  pub guide_url: String,
}

impl ChangeReport {
  pub fn render(&self) -> String {
    let mut out = String::from(REPORT_HEADER);

    out.push_str("\n## Added files\n\n");
    push_list(&mut out, &self.added);

    out.push_str("\n## Moved to `.backup`\n\n");
    push_list(&mut out, &self.moved);

    if self.manifests_diverged {
      out.push('\n');
      out.push_str(DIVERGENCE_NOTE);
    }

    out.push_str(&format!(
      "\n## Learn more\n\nSee {} for the new project layout.\n",
      self.guide_url
    ));
    out
  }

  /// Write the rendered report, creating the parent folder if needed.
  pub fn write(&self, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, self.render())
  }
}

fn push_list(out: &mut String, items: &[String]) {
  if items.is_empty() {
    out.push_str("_None_\n");
    return;
  }
  for item in items {
    out.push_str(&format!("- `{}`\n", item));
  }
}
