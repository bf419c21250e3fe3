//! Windows-only integration tests. These run the real `sc` but only query.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn status_names_the_service() {
  let env = TestEnv::new();

  env
    .svntest_cmd()
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("test-svn-server"));
}
