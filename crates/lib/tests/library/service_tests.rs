//! Service lifecycle against the simulated service manager.

use std::path::PathBuf;

use svntest_lib::consts::REQUIRED_BINARIES;
use svntest_lib::util::testutil::{FakeServiceControl, populate_dir};
use svntest_lib::{SetupError, Svnserve, SvnserveConfig, write_pre_revprop_change_hook};

use super::common::SourceTree;

fn config(tree: &SourceTree) -> SvnserveConfig {
  SvnserveConfig {
    host: "localhost".to_string(),
    ports: vec![3697],
    repos_path: tree.path().join("repos"),
    base_dir: Some(tree.path().join("work")),
  }
}

/// Required binaries split over three directories, with a decoy copy of
/// `svnserve.exe` in the last one.
fn split_binaries(tree: &SourceTree) -> Vec<PathBuf> {
  let (first, second) = REQUIRED_BINARIES.split_at(3);
  let dirs = vec![
    tree.path().join("path1"),
    tree.path().join("path2"),
    tree.path().join("path3"),
  ];
  populate_dir(&dirs[0], first).unwrap();
  populate_dir(&dirs[1], second).unwrap();
  std::fs::create_dir_all(&dirs[2]).unwrap();
  std::fs::write(dirs[2].join("svnserve.exe"), "decoy").unwrap();
  dirs
}

#[tokio::test]
async fn full_lifecycle() {
  let tree = SourceTree::new();
  let dirs = split_binaries(&tree);
  let svnserve = Svnserve::with_runner(config(&tree), FakeServiceControl::new()).with_search_dirs(dirs);

  let session = svnserve.setup().await.unwrap();
  assert_eq!(session.uri(), "svn://localhost:3697");

  let staging = svnserve.staging_dir().unwrap();
  assert_eq!(std::fs::read_dir(&staging).unwrap().count(), REQUIRED_BINARIES.len());
  assert_eq!(std::fs::read_to_string(staging.join("svnserve.exe")).unwrap(), "svnserve.exe");

  // A second setup reuses the registration and just restarts it.
  let again = svnserve.setup().await.unwrap();
  assert!(!again.created_service());
  again.release().await.unwrap();
  assert!(svnserve.runner().is_installed());

  svnserve.teardown().await.unwrap();
  assert!(!svnserve.runner().is_running());

  session.release().await.unwrap();
  assert!(!svnserve.runner().is_installed());
  assert!(!staging.exists());
}

#[tokio::test]
async fn missing_binary_is_named() {
  let tree = SourceTree::new();
  let dir = tree.path().join("bin");
  let without_sqlite: Vec<&str> = REQUIRED_BINARIES.iter().copied().filter(|b| *b != "sqlite3.dll").collect();
  populate_dir(&dir, &without_sqlite).unwrap();
  let svnserve = Svnserve::with_runner(config(&tree), FakeServiceControl::new()).with_search_dirs(vec![dir]);

  let err = svnserve.setup().await.err().unwrap();

  assert!(matches!(&err, SetupError::MissingBinaries(missing) if missing == &["sqlite3.dll"]));
  assert_eq!(err.to_string(), "can't find libraries to work svnserve: sqlite3.dll");
  assert_eq!(svnserve.runner().sc_verbs(), ["query", "query"]);
}

#[tokio::test]
async fn remove_without_service_only_clears_staging() {
  let tree = SourceTree::new();
  let svnserve = Svnserve::with_runner(config(&tree), FakeServiceControl::new());

  svnserve.remove().await.unwrap();

  assert_eq!(svnserve.runner().sc_verbs(), ["query"]);
}

/// A `svnserve` source directory sitting where the staging directory goes.
fn source_dir_at_staging(tree: &SourceTree) -> PathBuf {
  let source = tree.path().join("work").join("svnserve");
  std::fs::create_dir_all(&source).unwrap();
  std::fs::write(source.join("main.c"), "int main(void) { return 0; }").unwrap();
  source
}

#[tokio::test]
async fn remove_leaves_existing_source_directory() {
  let tree = SourceTree::new();
  let source = source_dir_at_staging(&tree);
  let svnserve = Svnserve::with_runner(config(&tree), FakeServiceControl::installed());
  assert_eq!(svnserve.staging_dir().unwrap(), source);

  svnserve.remove().await.unwrap();

  assert!(!svnserve.runner().is_installed());
  assert!(source.join("main.c").is_file());
}

#[tokio::test]
async fn failed_setup_leaves_existing_source_directory() {
  let tree = SourceTree::new();
  let source = source_dir_at_staging(&tree);
  let dir = tree.path().join("bin");
  populate_dir(&dir, &["svnserve.exe", "libapr.dll"]).unwrap();
  let svnserve = Svnserve::with_runner(config(&tree), FakeServiceControl::new()).with_search_dirs(vec![dir]);

  let err = svnserve.setup().await.err().unwrap();

  assert!(matches!(err, SetupError::MissingBinaries(_)));
  assert!(source.join("main.c").is_file());
  assert!(!source.join("svnserve.exe").exists());
  assert!(!source.join("libapr.dll").exists());
}

#[tokio::test]
async fn released_setup_keeps_directory_it_did_not_create() {
  let tree = SourceTree::new();
  let source = tree.path().join("work").join("svnserve");
  std::fs::create_dir_all(&source).unwrap();
  let dir = tree.path().join("bin");
  populate_dir(&dir, REQUIRED_BINARIES).unwrap();
  let svnserve = Svnserve::with_runner(config(&tree), FakeServiceControl::new()).with_search_dirs(vec![dir]);

  let session = svnserve.setup().await.unwrap();
  assert!(session.created_service());
  session.release().await.unwrap();

  assert!(!svnserve.runner().is_installed());
  assert!(source.is_dir());
  assert_eq!(std::fs::read_dir(&source).unwrap().count(), 0);
}

#[test]
fn hook_is_written_next_to_repository_hooks() {
  let tree = SourceTree::new();
  let hook = tree.path().join("repos").join("hooks").join("pre-revprop-change");

  let path = write_pre_revprop_change_hook(&hook, "jrandom", "svn:log").unwrap();

  let content = std::fs::read_to_string(path).unwrap();
  assert!(content.contains("if \"%PROPNAME%\" == \"svn:log\" if \"%USER%\" == \"jrandom\" exit 0"));
}
