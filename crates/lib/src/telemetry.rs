//! Fire-and-forget telemetry.
//!
//! The upgrade reports progress and swallowed failures through [`Telemetry`].
//! Hosts plug in their own reporter; [`TracingTelemetry`] forwards events to
//! the log.

use std::collections::BTreeMap;
use std::error::Error;

use tracing::{debug, warn};

/// Event properties, sorted for stable output.
pub type Properties = BTreeMap<String, String>;

pub trait Telemetry {
  fn send_event(&self, name: &str, properties: &Properties);
  fn send_error_event(&self, name: &str, error: &dyn Error);
}

/// Event names.
pub mod events {
  pub const NOTIFICATION: &str = "project-consolidate-notification";
  pub const GUIDE: &str = "project-consolidate-guide";
  pub const CANCEL: &str = "project-consolidate-cancel";
  pub const UPGRADE_START: &str = "project-consolidate-upgrade-start";
  pub const UPGRADE: &str = "project-consolidate-upgrade";
  pub const ERROR: &str = "project-consolidate-error";
  pub const ADD_LOCAL_ENV: &str = "project-consolidate-add-local-env";
  pub const COPY_AZURE_MANIFEST: &str = "project-consolidate-copy-azure-manifest";
  pub const ADD_SPFX_MANIFEST: &str = "project-consolidate-add-spfx-manifest";
  pub const BACKUP_CONFIG: &str = "project-consolidate-backup-config";
  pub const BACKUP_MANIFEST: &str = "project-consolidate-backup-manifest";
  pub const CHECK_MANIFEST_ERROR: &str = "project-consolidate-check-manifest-error";
  pub const ROLLBACK_ERROR: &str = "project-consolidate-rollback-error";
  pub const REPORT_ERROR: &str = "project-consolidate-report-error";
  pub const IGNORE_ERROR: &str = "project-consolidate-ignore-error";
}

/// Property keys.
pub mod props {
  pub const PLATFORM: &str = "platform";
  pub const OPERATION: &str = "operation";
  pub const MODAL: &str = "modal";
  pub const FILE: &str = "file";
  pub const SPFX: &str = "spfx";
  pub const MANIFESTS_DIVERGED: &str = "manifests-diverged";
}

/// Build a property map from key/value pairs.
pub fn properties<I, K, V>(pairs: I) -> Properties
where
  I: IntoIterator<Item = (K, V)>,
  K: Into<String>,
  V: Into<String>,
{
  pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Writes every event to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
  fn send_event(&self, name: &str, properties: &Properties) {
    debug!(event = name, properties = ?properties, "telemetry");
  }

  fn send_error_event(&self, name: &str, error: &dyn Error) {
    warn!(event = name, error = %error, "telemetry error");
  }
}
