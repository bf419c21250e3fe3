//! Shared helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Fixtures are shared with the library's tests.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("..")
    .join("lib")
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// A scratch source tree holding `build.conf`, plus an output directory.
pub struct TestEnv {
  pub temp: TempDir,
  pub top_dir: PathBuf,
  pub base_dir: PathBuf,
  pub ext_dir: PathBuf,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let top_dir = temp.path().join("trunk");
    let base_dir = top_dir.join("subversion").join("bindings").join("swig").join("ruby");
    let ext_dir = temp.path().join("ext");
    std::fs::create_dir_all(&base_dir).expect("Failed to create base dir");
    std::fs::copy(fixture_path("build.conf"), top_dir.join("build.conf")).expect("Failed to copy build.conf");

    Self {
      temp,
      top_dir,
      base_dir,
      ext_dir,
    }
  }

  /// A `svntest` command running inside the temp directory.
  pub fn svntest_cmd(&self) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_svntest"));
    cmd.current_dir(self.temp.path()).env("RUST_LOG", "warn");
    cmd
  }

  /// `svntest env` with the tree's directories filled in.
  pub fn env_cmd(&self) -> Command {
    let mut cmd = self.svntest_cmd();
    cmd
      .arg("env")
      .arg("--top-dir")
      .arg(&self.top_dir)
      .arg("--base-dir")
      .arg(&self.base_dir)
      .arg("--ext-dir")
      .arg(&self.ext_dir);
    cmd
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }
}
