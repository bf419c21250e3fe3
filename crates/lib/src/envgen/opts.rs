//! `gen-make.opts` and the third-party libraries it points at.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SetupError};
use crate::platform::paths::absolutize;

/// `key = value` options recorded by `gen-make.py`, such as `--with-apr`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenMakeOpts {
  values: BTreeMap<String, String>,
}

impl GenMakeOpts {
  /// Parse `key = value` lines. The first `=` splits a line; lines without
  /// one are skipped. A later key overrides an earlier one.
  pub fn parse(content: &str) -> Self {
    let values = content
      .lines()
      .filter_map(|line| line.split_once('='))
      .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
      .collect();
    Self { values }
  }

  /// Read `path`, treating a missing file as empty.
  pub fn load(path: &Path) -> Result<Self> {
    match std::fs::read_to_string(path) {
      Ok(content) => Ok(Self::parse(&content)),
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        debug!(path = ?path, "no gen-make.opts, using defaults");
        Ok(Self::default())
      }
      Err(source) => Err(SetupError::Read {
        path: path.to_path_buf(),
        source,
      }),
    }
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.values.get(key).map(String::as_str)
  }

  /// Directory given with `--with-<lib>`, if any.
  pub fn with_dir(&self, lib: &str) -> Option<&str> {
    self.get(&format!("--with-{}", lib))
  }
}

/// Where a dependency keeps its DLLs below its own directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DllSubdir {
  /// The build configuration directory, e.g. `Release`.
  BuildType,
  Fixed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyLib {
  pub name: &'static str,
  pub subdir: DllSubdir,
}

/// Third-party libraries whose DLL directories are put on `PATH`.
pub const DEPENDENCY_LIBS: &[DependencyLib] = &[
  DependencyLib {
    name: "apr",
    subdir: DllSubdir::BuildType,
  },
  DependencyLib {
    name: "apr-util",
    subdir: DllSubdir::BuildType,
  },
  DependencyLib {
    name: "apr-iconv",
    subdir: DllSubdir::BuildType,
  },
  DependencyLib {
    name: "berkeley-db",
    subdir: DllSubdir::Fixed("bin"),
  },
  DependencyLib {
    name: "sqlite",
    subdir: DllSubdir::Fixed("bin"),
  },
];

impl DependencyLib {
  /// `<top_dir>/<--with-NAME or NAME>/<subdir>`, made absolute.
  pub fn dll_dir(&self, top_dir: &Path, build_type: &str, opts: &GenMakeOpts) -> Result<PathBuf> {
    let lib_dir = opts.with_dir(self.name).unwrap_or(self.name);
    let subdir = match self.subdir {
      DllSubdir::BuildType => build_type,
      DllSubdir::Fixed(dir) => dir,
    };
    Ok(absolutize(&top_dir.join(lib_dir).join(subdir))?)
  }
}
