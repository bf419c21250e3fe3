pub const APP_NAME: &str = "svntest";

/// Name under which the svnserve service is registered with the service manager.
pub const SERVICE_NAME: &str = "test-svn-server";

/// Service type passed to `sc create`.
pub const SERVICE_TYPE: &str = "own";

pub const DEFAULT_SVNSERVE_HOST: &str = "localhost";
pub const DEFAULT_SVNSERVE_PORT: u16 = 3690;

/// Name of the staging directory created under the base directory.
pub const STAGING_DIR_NAME: &str = "svnserve";

pub const SVNSERVE_EXE: &str = "svnserve.exe";

/// Files svnserve needs to run as a service, copied into the staging directory.
pub const REQUIRED_BINARIES: &[&str] = &[
  SVNSERVE_EXE,
  "libsvn_subr-1.dll",
  "libsvn_repos-1.dll",
  "libsvn_fs-1.dll",
  "libsvn_delta-1.dll",
  "libaprutil.dll",
  "libapr.dll",
  "sqlite3.dll",
];

/// Build configuration directory the extension modules are taken from.
pub const DEFAULT_BUILD_TYPE: &str = "Release";

pub const BUILD_CONF: &str = "build.conf";
pub const GEN_MAKE_OPTS: &str = "gen-make.opts";

/// Base name of the generated helper every module wrapper requires.
pub const UTIL_NAME: &str = "util";

/// Extension of the generated wrapper scripts.
pub const WRAPPER_EXT: &str = "rb";

/// Extension of the compiled modules the wrappers load.
pub const MODULE_EXT: &str = "so";

/// Directory next to the build output holding the bindings' own runtime library.
pub const SWIG_RUBY_DLL_DIR: &str = "libsvn_swig_ruby";

/// Revision property the generated hook authorizes changes to by default.
pub const PROP_REVISION_LOG: &str = "svn:log";

/// Separator of the Windows `PATH` list.
pub const PATH_LIST_SEPARATOR: char = ';';

/// Build output directory of svnserve below `subversion/`.
pub const SVNSERVE_BUILD_DIR: &str = "svnserve";
