//! svnserve settings.
//!
//! Settings come from an optional JSON file; every field has a default and the
//! CLI overrides individual fields with flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SVNSERVE_HOST, DEFAULT_SVNSERVE_PORT};
use crate::error::{Result, SetupError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SvnserveConfig {
  /// Host svnserve listens on.
  pub host: String,
  /// Candidate ports; the first one is used.
  pub ports: Vec<u16>,
  /// Repository root served by svnserve.
  pub repos_path: PathBuf,
  /// Directory the staging directory is created in. There is no default:
  /// the staging directory must not land in an arbitrary working directory.
  pub base_dir: Option<PathBuf>,
}

impl Default for SvnserveConfig {
  fn default() -> Self {
    Self {
      host: DEFAULT_SVNSERVE_HOST.to_string(),
      ports: vec![DEFAULT_SVNSERVE_PORT],
      repos_path: PathBuf::from("repos"),
      base_dir: None,
    }
  }
}

impl SvnserveConfig {
  pub fn from_file(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path).map_err(|source| SetupError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| SetupError::Config {
      path: path.to_path_buf(),
      source,
    })
  }

  /// The first configured port.
  pub fn port(&self) -> Result<u16> {
    self.ports.first().copied().ok_or(SetupError::NoPorts)
  }

  pub fn uri(&self) -> Result<String> {
    Ok(format!("svn://{}:{}", self.host, self.port()?))
  }

  pub fn base_dir(&self) -> Result<&Path> {
    self.base_dir.as_deref().ok_or(SetupError::NoBaseDir)
  }
}
