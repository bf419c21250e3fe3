//! Collecting the files svnserve needs into the staging directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, SetupError};

/// Copy each of `targets` from the first directory in `search_dirs` that has
/// it into `dest`.
///
/// Directories are scanned in order and scanning stops as soon as every
/// target has been found, so each file is copied at most once. Fails with
/// [`SetupError::MissingBinaries`] naming the files no directory had.
pub fn collect_binaries(search_dirs: &[PathBuf], targets: &[&str], dest: &Path) -> Result<Vec<PathBuf>> {
  let mut remaining: Vec<&str> = targets.to_vec();
  let mut copied = Vec::new();

  for dir in search_dirs {
    if remaining.is_empty() {
      break;
    }

    let (found, missing): (Vec<&str>, Vec<&str>) =
      remaining.iter().copied().partition(|target| dir.join(target).is_file());

    for target in found {
      let source = dir.join(target);
      let destination = dest.join(target);
      debug!(source = ?source, destination = ?destination, "copying binary");
      std::fs::copy(&source, &destination).map_err(|source_err| SetupError::Copy {
        path: source.clone(),
        source: source_err,
      })?;
      copied.push(destination);
    }

    remaining = missing;
  }

  if !remaining.is_empty() {
    return Err(SetupError::MissingBinaries(
      remaining.into_iter().map(str::to_string).collect(),
    ));
  }

  info!(count = copied.len(), dest = ?dest, "collected svnserve binaries");
  Ok(copied)
}

/// Directories listed in the process's `PATH`.
pub fn path_dirs() -> Vec<PathBuf> {
  std::env::var_os("PATH")
    .map(|value| std::env::split_paths(&value).collect())
    .unwrap_or_default()
}
