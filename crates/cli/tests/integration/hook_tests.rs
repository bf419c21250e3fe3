//! `svntest hook` integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn hook_writes_cmd_script_for_given_user() {
  let env = TestEnv::new();
  let hook = env.path().join("repos").join("hooks").join("pre-revprop-change");

  env
    .svntest_cmd()
    .arg("hook")
    .arg("--path")
    .arg(&hook)
    .arg("--user")
    .arg("jrandom")
    .assert()
    .success()
    .stdout(predicate::str::contains("Allows: jrandom on svn:log"));

  let content = std::fs::read_to_string(env.path().join("repos/hooks/pre-revprop-change.cmd")).unwrap();
  assert!(content.contains("if \"%PROPNAME%\" == \"svn:log\" if \"%USER%\" == \"jrandom\" exit 0\r\n"));
}

#[test]
fn hook_defaults_to_current_user() {
  let env = TestEnv::new();
  let hook = env.path().join("pre-revprop-change");

  env
    .svntest_cmd()
    .env("USERNAME", "harry")
    .arg("hook")
    .arg("--path")
    .arg(&hook)
    .arg("--property")
    .arg("svn:author")
    .assert()
    .success()
    .stdout(predicate::str::contains("Allows: harry on svn:author"));
}

#[test]
fn hook_without_known_user_fails() {
  let env = TestEnv::new();

  env
    .svntest_cmd()
    .env_remove("USERNAME")
    .env_remove("USER")
    .arg("hook")
    .arg("--path")
    .arg(env.path().join("pre-revprop-change"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("current user is unknown"));

  assert!(!env.path().join("pre-revprop-change.cmd").exists());
}
