//! Error types for svntest-lib.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up svnserve or generating the test environment.
#[derive(Debug, Error)]
pub enum SetupError {
  /// `sc` reported `FAILED` in its output.
  #[error("Failed to {command} {service}: {args}")]
  ServiceControl {
    command: String,
    service: String,
    args: String,
  },

  #[error("Failed to spawn '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("can't find libraries to work svnserve: {}", .0.join(" "))]
  MissingBinaries(Vec<String>),

  #[error("no svnserve port configured")]
  NoPorts,

  #[error("no svnserve base directory configured")]
  NoBaseDir,

  #[error("base directory '{base}' is not inside top directory '{top}'")]
  BaseDirOutsideTop { top: PathBuf, base: PathBuf },

  #[error("Failed to read '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to write '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to create directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to copy '{path}': {source}")]
  Copy {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to remove '{path}': {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Invalid config '{path}': {source}")]
  Config {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("IO error: {0}")]
  Io(#[from] io::Error),
}

pub type Result<T, E = SetupError> = std::result::Result<T, E>;
