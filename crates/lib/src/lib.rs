//! Windows test-support tooling for the Subversion test suite.
//!
//! - [`service`] registers, starts, stops and removes a `svnserve` service.
//! - [`envgen`] generates the Ruby wrappers that put the build's DLL
//!   directories on `PATH` before loading the compiled bindings.
//! - [`hook`] writes the pre-revprop-change hook the tests rely on.

pub mod config;
pub mod consts;
pub mod envgen;
pub mod error;
pub mod exec;
pub mod hook;
pub mod platform;
pub mod search_path;
pub mod service;
pub mod util;

pub use config::SvnserveConfig;
pub use envgen::{EnvironmentGenerator, GeneratedEnvironment, setup_test_environment};
pub use error::{Result, SetupError};
pub use hook::write_pre_revprop_change_hook;
pub use search_path::SearchPath;
pub use service::{Svnserve, SvnserveCleanup, SvnserveSession};
