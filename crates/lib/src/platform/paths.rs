//! Path normalization shared by the service manager and the generators.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against the current directory and fold `.` and `..`
/// lexically. The path does not need to exist.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
  let joined = if path.is_absolute() {
    path.to_path_buf()
  } else {
    std::env::current_dir()?.join(path)
  };

  let mut normalized = PathBuf::new();
  for component in joined.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        normalized.pop();
      }
      other => normalized.push(other.as_os_str()),
    }
  }

  Ok(dunce::simplified(&normalized).to_path_buf())
}

/// Replace forward slashes with backslashes, as `sc` and `cacls` expect.
pub fn to_windows_separators(path: &str) -> String {
  path.replace('/', "\\")
}
