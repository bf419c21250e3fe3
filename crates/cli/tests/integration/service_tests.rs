//! Service command integration tests that do not touch a real service.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn start_with_empty_port_list_in_config_fails() {
  let env = TestEnv::new();
  let config = env.path().join("svnserve.json");
  std::fs::write(&config, r#"{ "ports": [], "base_dir": "work" }"#).unwrap();

  env
    .svntest_cmd()
    .arg("start")
    .arg("--config")
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("no svnserve port configured"));
}

#[test]
fn malformed_config_is_reported() {
  let env = TestEnv::new();
  let config = env.path().join("svnserve.json");
  std::fs::write(&config, "{ ports: ").unwrap();

  env
    .svntest_cmd()
    .arg("status")
    .arg("--config")
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn unknown_port_value_is_rejected_by_parser() {
  let env = TestEnv::new();

  env
    .svntest_cmd()
    .arg("status")
    .arg("--port")
    .arg("not-a-port")
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn remove_without_base_dir_is_refused() {
  let env = TestEnv::new();
  let staging = env.path().join("svnserve");
  std::fs::create_dir_all(&staging).unwrap();
  std::fs::write(staging.join("main.c"), "int main(void) { return 0; }").unwrap();

  env
    .svntest_cmd()
    .arg("remove")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--base-dir is required"));

  assert!(staging.join("main.c").is_file());
}

#[test]
fn start_without_base_dir_is_refused() {
  let env = TestEnv::new();

  env
    .svntest_cmd()
    .arg("start")
    .arg("--repos")
    .arg(env.path().join("repos"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("--base-dir is required"));
}
