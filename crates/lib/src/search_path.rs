//! The Windows `PATH` list as the generated `util.rb` manipulates it.
//!
//! [`SearchPath::prepend`] follows the generated `add_path` procedure: the
//! directory is converted to backslash separators and put in front only if
//! that exact entry is not present yet.

use std::fmt;

use crate::consts::PATH_LIST_SEPARATOR;
use crate::platform::paths::to_windows_separators;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
  entries: Vec<String>,
}

impl SearchPath {
  /// Split a `;`-separated value. Empty segments are kept, as Ruby's
  /// `String#split` keeps inner ones.
  pub fn parse(value: &str) -> Self {
    let mut entries: Vec<String> = value.split(PATH_LIST_SEPARATOR).map(str::to_string).collect();
    while entries.last().is_some_and(|entry| entry.is_empty()) {
      entries.pop();
    }
    Self { entries }
  }

  /// The current process's `PATH`, or an empty list.
  pub fn from_env() -> Self {
    std::env::var("PATH").map(|value| Self::parse(&value)).unwrap_or_default()
  }

  pub fn entries(&self) -> &[String] {
    &self.entries
  }

  pub fn contains(&self, dir: &str) -> bool {
    let dir = to_windows_separators(dir);
    self.entries.iter().any(|entry| *entry == dir)
  }

  /// Put `dir` first unless it is already listed. Returns whether it was added.
  pub fn prepend(&mut self, dir: &str) -> bool {
    let dir = to_windows_separators(dir);
    if self.entries.contains(&dir) {
      return false;
    }
    self.entries.insert(0, dir);
    true
  }

  /// Prepend each directory in order, so the last one ends up first.
  pub fn prepend_all<I, S>(&mut self, dirs: I)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    for dir in dirs {
      self.prepend(dir.as_ref());
    }
  }
}

impl fmt::Display for SearchPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let separator = PATH_LIST_SEPARATOR.to_string();
    write!(f, "{}", self.entries.join(&separator))
  }
}
