//! Diff command integration tests.

use predicates::prelude::*;

use super::common::{LOCAL_MANIFEST, REMOTE_MANIFEST, TestEnv};

#[test]
fn diff_equivalent_templates() {
  let env = TestEnv::tab_project();

  env
    .teamsfx_cmd()
    .args(["diff", LOCAL_MANIFEST, REMOTE_MANIFEST])
    .assert()
    .success()
    .stdout(predicate::str::contains("equivalent"));
}

#[test]
fn diff_reports_divergence_without_failing() {
  let env = TestEnv::tab_project();
  env.write_file(
    LOCAL_MANIFEST,
    r#"{ "manifestVersion": "1.11", "permissions": ["identity"] }"#,
  );
  env.write_file(
    REMOTE_MANIFEST,
    r#"{ "manifestVersion": "1.12", "permissions": ["identity", "messageTeamMembers"] }"#,
  );

  env
    .teamsfx_cmd()
    .args(["diff", LOCAL_MANIFEST, REMOTE_MANIFEST])
    .assert()
    .success()
    .stderr(predicate::str::contains("differ"));
}

#[test]
fn diff_json_output() {
  let env = TestEnv::tab_project();
  env.write_file(LOCAL_MANIFEST, r#"{ "name": { "short": "a-local-debug" }, "id": "1" }"#);
  env.write_file(REMOTE_MANIFEST, r#"{ "name": { "short": "a" }, "id": "1" }"#);

  let output = env
    .teamsfx_cmd()
    .args(["--output", "json", "diff", LOCAL_MANIFEST, REMOTE_MANIFEST])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["equivalent"], true);
}

#[test]
fn diff_malformed_template_fails() {
  let env = TestEnv::tab_project();
  env.write_file(LOCAL_MANIFEST, "{ not json");

  env
    .teamsfx_cmd()
    .args(["diff", LOCAL_MANIFEST, REMOTE_MANIFEST])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to compare manifest templates"));
}
