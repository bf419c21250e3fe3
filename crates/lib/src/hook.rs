//! Repository hook scripts.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, SetupError};

/// Write `<hook_path>.cmd`, a pre-revprop-change hook that allows changing
/// `property` only when the change is made by `user`.
///
/// svnserve passes the repository, revision, user and property name as
/// `%1`..`%4`; any other combination exits 1 and the change is refused.
pub fn write_pre_revprop_change_hook(hook_path: &Path, user: &str, property: &str) -> Result<PathBuf> {
  let mut file_name = hook_path.as_os_str().to_owned();
  file_name.push(".cmd");
  let path = PathBuf::from(file_name);

  info!(path = ?path, user = %user, property = %property, "writing pre-revprop-change hook");

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).map_err(|source| SetupError::CreateDir {
      path: parent.to_path_buf(),
      source,
    })?;
  }

  std::fs::write(&path, render_pre_revprop_change_hook(user, property)).map_err(|source| SetupError::Write {
    path: path.clone(),
    source,
  })?;

  Ok(path)
}

fn render_pre_revprop_change_hook(user: &str, property: &str) -> String {
  format!(
    "set REPOS=%1\r\n\
     set REV=%2\r\n\
     set USER=%3\r\n\
     set PROPNAME=%4\r\n\
     if \"%PROPNAME%\" == \"{property}\" if \"%USER%\" == \"{user}\" exit 0\r\n\
     exit 1\r\n"
  )
}
