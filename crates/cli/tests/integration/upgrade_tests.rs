//! Upgrade command integration tests.

use predicates::prelude::*;

use super::common::{LOCAL_ENV_CONFIG, LOCAL_MANIFEST, LOCAL_SETTINGS, REMOTE_MANIFEST, TestEnv, UNIFIED_MANIFEST};

#[test]
fn upgrade_consolidates_tab_project() {
  let env = TestEnv::tab_project();
  let remote = env.read_file(REMOTE_MANIFEST);

  env
    .teamsfx_cmd()
    .args(["upgrade", "--yes"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Upgrade complete"))
    .stdout(predicate::str::contains(format!("  {REMOTE_MANIFEST} → .backup/{REMOTE_MANIFEST}")));

  assert_eq!(env.read_file(UNIFIED_MANIFEST), remote);
  let config: serde_json::Value = serde_json::from_str(&env.read_file(LOCAL_ENV_CONFIG)).unwrap();
  assert_eq!(config["manifest"]["appName"]["short"], "contoso-hr-local-debug");

  for moved in [LOCAL_SETTINGS, LOCAL_MANIFEST, REMOTE_MANIFEST] {
    assert!(!env.exists(moved), "{moved} should be moved");
    assert!(env.exists(&format!(".backup/{moved}")), "{moved} should be backed up");
  }
  assert!(env.exists(".backup/upgrade-change-logs.md"));

  let ignore = env.read_file(".gitignore");
  assert!(ignore.lines().any(|l| l.trim() == ".backup/"));
  assert!(ignore.lines().any(|l| l.trim() == LOCAL_ENV_CONFIG));
}

#[test]
fn upgrade_rewrites_spfx_tab_urls() {
  let env = TestEnv::spfx_project();

  env.teamsfx_cmd().args(["upgrade", "--yes"]).assert().success();

  let manifest: serde_json::Value = serde_json::from_str(&env.read_file(UNIFIED_MANIFEST)).unwrap();
  let url = manifest["staticTabs"][0]["contentUrl"].as_str().unwrap();
  assert!(url.starts_with("{{^config.isLocalDebug}}"));
  assert_eq!(url.matches("componentId=0d5b5a4e-1e7c-4f0b-9a52-5c6e2f0f3a11%26").count(), 2);
}

#[test]
fn upgrade_is_noop_on_second_run() {
  let env = TestEnv::tab_project();
  env.teamsfx_cmd().args(["upgrade", "--yes"]).assert().success();
  let manifest = env.read_file(UNIFIED_MANIFEST);

  env
    .teamsfx_cmd()
    .args(["upgrade", "--yes"])
    .assert()
    .success()
    .stdout(predicate::str::contains("does not need an upgrade"));

  assert_eq!(env.read_file(UNIFIED_MANIFEST), manifest);
}

#[test]
fn upgrade_without_yes_in_non_interactive_mode_fails() {
  let env = TestEnv::tab_project();

  env
    .teamsfx_cmd()
    .arg("upgrade")
    .assert()
    .failure()
    .stderr(predicate::str::contains("non-interactive"));

  assert!(env.exists(LOCAL_SETTINGS));
  assert!(env.exists(REMOTE_MANIFEST));
  assert!(!env.exists(UNIFIED_MANIFEST));
  assert!(!env.exists(".backup"));
}

#[test]
fn upgrade_with_feature_disabled_leaves_project() {
  let env = TestEnv::tab_project();

  env
    .teamsfx_cmd()
    .env_remove("TEAMSFX_CONFIG_UNIFY")
    .arg("upgrade")
    .assert()
    .success()
    .stdout(predicate::str::contains("does not need an upgrade"));

  assert!(env.exists(REMOTE_MANIFEST));
}

#[test]
fn upgrade_failure_rolls_back() {
  let env = TestEnv::spfx_project();
  env.write_file(REMOTE_MANIFEST, "{ broken");

  env
    .teamsfx_cmd()
    .args(["upgrade", "--yes"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Upgrade failed"));

  assert_eq!(env.read_file(REMOTE_MANIFEST), "{ broken");
  assert!(!env.exists(LOCAL_ENV_CONFIG));
  assert!(!env.exists(UNIFIED_MANIFEST));
  assert!(!env.exists(".backup"));
}

#[test]
fn upgrade_json_output() {
  let env = TestEnv::tab_project();

  let output = env
    .teamsfx_cmd()
    .args(["--output", "json", "upgrade", "--yes"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["status"], "upgraded");
  assert_eq!(json["report"]["moved"].as_array().unwrap().len(), 3);
  assert_eq!(json["report"]["manifests_diverged"], false);
}
