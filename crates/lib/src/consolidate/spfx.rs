//! Tab URL rewriting for SharePoint Framework projects.
//!
//! SPFx tabs are served from SharePoint, so their URLs carry the web part's
//! component id. The unified template swaps each tab URL for one that
//! renders the hosted page remotely and the local workbench when debugging.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::ConsolidateError;

/// Static tab URL; both `%s` are the component id.
pub const LOCAL_CONTENT_URL: &str = "{{^config.isLocalDebug}}https://{teamSiteDomain}/_layouts/15/TeamsLogon.aspx?SPFX=true&dest=/_layouts/15/teamshostedapp.aspx%3Fteams%26personal%26componentId=%s%26forceLocale={locale}{{/config.isLocalDebug}}{{#config.isLocalDebug}}https://{teamSiteDomain}/_layouts/15/TeamsLogon.aspx?SPFX=true&dest=/_layouts/15/teamshostedapp.aspx%3Fteams%26personal%26componentId=%s%26forceLocale={locale}%26loadSPFX=true%26debugManifestsFile=https%3A%2F%2Flocalhost%3A4321%2Ftemp%2Fmanifests.js{{/config.isLocalDebug}}";

/// Configurable tab URL; both `%s` are the component id.
pub const LOCAL_CONFIGURATION_URL: &str = "{{^config.isLocalDebug}}https://{teamSiteDomain}{teamSitePath}/_layouts/15/TeamsLogon.aspx?SPFX=true&dest={teamSitePath}/_layouts/15/teamshostedapp.aspx%3FopenPropertyPane=true%26teams%26componentId=%s%26forceLocale={locale}{{/config.isLocalDebug}}{{#config.isLocalDebug}}https://{teamSiteDomain}{teamSitePath}/_layouts/15/TeamsLogon.aspx?SPFX=true&dest={teamSitePath}/_layouts/15/teamshostedapp.aspx%3FopenPropertyPane=true%26teams%26componentId=%s%26forceLocale={locale}%26loadSPFX=true%26debugManifestsFile=https%3A%2F%2Flocalhost%3A4321%2Ftemp%2Fmanifests.js{{/config.isLocalDebug}}";

static COMPONENT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"componentId=([a-z0-9-]*)%26").expect("valid regex"));

/// Component id embedded in a tab URL, or an empty string.
pub fn component_id(url: &str) -> &str {
  COMPONENT_ID
    .captures(url)
    .and_then(|c| c.get(1))
    .map_or("", |m| m.as_str())
}

/// Fill both placeholders of a URL template with `id`.
pub fn format_url(template: &str, id: &str) -> String {
  template.replace("%s", id)
}

/// Rewrite static and configurable tab URLs in place.
pub fn rewrite_tabs(manifest: &mut Value) {
  rewrite_tab_urls(manifest, "staticTabs", "contentUrl", LOCAL_CONTENT_URL);
  rewrite_tab_urls(manifest, "configurableTabs", "configurationUrl", LOCAL_CONFIGURATION_URL);
}

fn rewrite_tab_urls(manifest: &mut Value, tabs_key: &str, url_key: &str, template: &str) {
  let Some(tabs) = manifest.get_mut(tabs_key).and_then(Value::as_array_mut) else {
    return;
  };
  for tab in tabs.iter_mut().filter_map(Value::as_object_mut) {
    let id = tab.get(url_key).and_then(Value::as_str).map(component_id).unwrap_or("");
    let url = format_url(template, id);
    tab.insert(url_key.to_string(), Value::String(url));
  }
}

/// Read the remote template and render the unified SPFx template.
pub fn render_unified_manifest(remote: &Path) -> Result<String, ConsolidateError> {
  let content = fs::read_to_string(remote).map_err(|source| ConsolidateError::Read {
    path: remote.to_path_buf(),
    source,
  })?;
  let mut manifest: Value = serde_json::from_str(&content).map_err(|source| ConsolidateError::Manifest {
    path: remote.to_path_buf(),
    source,
  })?;
  rewrite_tabs(&mut manifest);

  let mut out = serde_json::to_string_pretty(&manifest).map_err(|source| ConsolidateError::Serialize {
    what: "manifest template",
    source,
  })?;
  out.push('\n');
  Ok(out)
}
