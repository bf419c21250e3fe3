//! Generating the Ruby test environment for a Windows build.
//!
//! The Ruby bindings are loaded from the build output directory, and their
//! DLLs (plus those of every `libsvn_*` library and third-party dependency)
//! are spread across the build tree. `util.rb` puts all of those directories
//! on `PATH`, and one wrapper per `[swig_X]` module requires `util.rb` before
//! loading `X.so`.
//!
//! # Layout
//!
//! ```text
//! <top_dir>/
//! ├── build.conf
//! ├── gen-make.opts             # optional
//! └── Release/
//!     └── subversion/           # subversion_dir
//!         ├── libsvn_*/
//!         ├── svnserve/
//!         └── bindings/swig/ruby/  # dll_dir, mirrors <base_dir>
//! ```

pub mod build_conf;
pub mod opts;
pub mod ruby;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::consts::{
  BUILD_CONF, DEFAULT_BUILD_TYPE, GEN_MAKE_OPTS, SVNSERVE_BUILD_DIR, SWIG_RUBY_DLL_DIR, UTIL_NAME, WRAPPER_EXT,
};
use crate::error::{Result, SetupError};
use crate::platform::paths::absolutize;

use self::build_conf::{BuildConfSection, bindable_modules, libraries, read_build_conf};
use self::opts::{DEPENDENCY_LIBS, GenMakeOpts};

/// Directories derived from the top of the source tree and the bindings' directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
  pub top_dir: PathBuf,
  pub build_type: String,
  /// Build output directory of the bindings.
  pub dll_dir: PathBuf,
  /// `subversion/` inside the build output.
  pub subversion_dir: PathBuf,
}

impl BuildLayout {
  /// Re-root `base_dir` under `<top_dir>/<build_type>`.
  pub fn new(top_dir: &Path, base_dir: &Path, build_type: &str) -> Result<Self> {
    let top_dir = absolutize(top_dir)?;
    let base_dir = absolutize(base_dir)?;

    let relative = base_dir
      .strip_prefix(&top_dir)
      .map_err(|_| SetupError::BaseDirOutsideTop {
        top: top_dir.clone(),
        base: base_dir.clone(),
      })?;

    let dll_dir = absolutize(&top_dir.join(build_type).join(relative))?;
    let subversion_dir = absolutize(&dll_dir.join("..").join("..").join(".."))?;

    Ok(Self {
      top_dir,
      build_type: build_type.to_string(),
      dll_dir,
      subversion_dir,
    })
  }

  pub fn build_conf(&self) -> PathBuf {
    self.top_dir.join(BUILD_CONF)
  }
}

/// Directories collected for `util.rb`, in the order they are prepended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtilScript {
  dirs: Vec<PathBuf>,
}

impl UtilScript {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_path(&mut self, dir: PathBuf) {
    self.dirs.push(dir);
  }

  pub fn dirs(&self) -> &[PathBuf] {
    &self.dirs
  }

  pub fn render(&self) -> String {
    ruby::render_util(self.dirs.iter().map(PathBuf::as_path))
  }
}

/// The bindings' own output directory and its `libsvn_swig_ruby` sibling DLL directory.
pub fn write_util_header(dll_dir: &Path, out: &mut UtilScript) {
  out.add_path(dll_dir.to_path_buf());
  out.add_path(dll_dir.join(SWIG_RUBY_DLL_DIR));
}

/// One directory per third-party library, honoring `--with-*` overrides in
/// `gen-make.opts`.
pub fn append_dependency_paths(top_dir: &Path, build_type: &str, out: &mut UtilScript) -> Result<()> {
  let opts = GenMakeOpts::load(&top_dir.join(GEN_MAKE_OPTS))?;
  for lib in DEPENDENCY_LIBS {
    out.add_path(lib.dll_dir(top_dir, build_type, &opts)?);
  }
  Ok(())
}

/// One directory per `[libsvn_X]` section.
pub fn append_core_library_paths(sections: &[BuildConfSection], subversion_dir: &Path, out: &mut UtilScript) {
  for lib in libraries(sections) {
    out.add_path(subversion_dir.join(lib));
  }
}

/// Directories that follow the module wrappers: `libsvn_X` for each module `X`,
/// then svnserve's directory.
pub fn append_module_paths<S: AsRef<str>>(modules: &[S], subversion_dir: &Path, out: &mut UtilScript) {
  for module in modules {
    out.add_path(subversion_dir.join(format!("libsvn_{}", module.as_ref())));
  }
  out.add_path(subversion_dir.join(SVNSERVE_BUILD_DIR));
}

/// Write `<ext_dir>/<X>.rb` for every `[swig_X]` section and return the
/// module names in file order.
pub fn generate_module_wrappers(
  sections: &[BuildConfSection],
  ext_dir: &Path,
  dll_dir: &Path,
  util_name: &str,
) -> Result<Vec<String>> {
  let content = ruby::render_wrapper(util_name, dll_dir);
  let mut modules = Vec::new();

  for module in bindable_modules(sections) {
    let path = ext_dir.join(format!("{}.{}", module, WRAPPER_EXT));
    write_file(&path, &content)?;
    modules.push(module.to_string());
  }

  Ok(modules)
}

/// Files written by [`EnvironmentGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEnvironment {
  pub layout: BuildLayout,
  pub util_path: PathBuf,
  pub wrapper_paths: Vec<PathBuf>,
  pub modules: Vec<String>,
  /// Directories `util.rb` prepends to `PATH`, in call order.
  pub library_dirs: Vec<PathBuf>,
}

/// Generates `util.rb` and the module wrappers into an extension directory.
#[derive(Debug, Clone)]
pub struct EnvironmentGenerator {
  top_dir: PathBuf,
  base_dir: PathBuf,
  ext_dir: PathBuf,
  build_type: String,
  util_name: String,
}

impl EnvironmentGenerator {
  pub fn new(top_dir: impl Into<PathBuf>, base_dir: impl Into<PathBuf>, ext_dir: impl Into<PathBuf>) -> Self {
    Self {
      top_dir: top_dir.into(),
      base_dir: base_dir.into(),
      ext_dir: ext_dir.into(),
      build_type: DEFAULT_BUILD_TYPE.to_string(),
      util_name: UTIL_NAME.to_string(),
    }
  }

  pub fn with_build_type(mut self, build_type: &str) -> Self {
    self.build_type = build_type.to_string();
    self
  }

  pub fn layout(&self) -> Result<BuildLayout> {
    BuildLayout::new(&self.top_dir, &self.base_dir, &self.build_type)
  }

  /// The directories `util.rb` would prepend, without writing anything.
  pub fn library_dirs(&self) -> Result<Vec<PathBuf>> {
    let layout = self.layout()?;
    let sections = read_build_conf(&layout.build_conf())?;
    let modules: Vec<&str> = bindable_modules(&sections).collect();
    let util = collect_paths(&layout, &sections, &modules)?;
    Ok(util.dirs)
  }

  pub fn generate(&self) -> Result<GeneratedEnvironment> {
    std::fs::create_dir_all(&self.ext_dir).map_err(|source| SetupError::CreateDir {
      path: self.ext_dir.clone(),
      source,
    })?;

    let layout = self.layout()?;
    let sections = read_build_conf(&layout.build_conf())?;

    let modules = generate_module_wrappers(&sections, &self.ext_dir, &layout.dll_dir, &self.util_name)?;
    let util = collect_paths(&layout, &sections, &modules)?;

    let util_path = self.ext_dir.join(format!("{}.{}", self.util_name, WRAPPER_EXT));
    write_file(&util_path, &util.render())?;

    let wrapper_paths = modules
      .iter()
      .map(|module| self.ext_dir.join(format!("{}.{}", module, WRAPPER_EXT)))
      .collect();

    info!(
      ext_dir = ?self.ext_dir,
      modules = modules.len(),
      dirs = util.dirs().len(),
      "generated test environment"
    );

    Ok(GeneratedEnvironment {
      layout,
      util_path,
      wrapper_paths,
      modules,
      library_dirs: util.dirs,
    })
  }
}

/// Generate the environment for `base_dir` inside `top_dir` into `ext_dir`
/// using the `Release` build.
pub fn setup_test_environment(top_dir: &Path, base_dir: &Path, ext_dir: &Path) -> Result<GeneratedEnvironment> {
  EnvironmentGenerator::new(top_dir, base_dir, ext_dir).generate()
}

fn collect_paths<S: AsRef<str>>(
  layout: &BuildLayout,
  sections: &[BuildConfSection],
  modules: &[S],
) -> Result<UtilScript> {
  let mut util = UtilScript::new();
  write_util_header(&layout.dll_dir, &mut util);
  append_dependency_paths(&layout.top_dir, &layout.build_type, &mut util)?;
  append_core_library_paths(sections, &layout.subversion_dir, &mut util);
  append_module_paths(modules, &layout.subversion_dir, &mut util);
  Ok(util)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
  info!(path = ?path, "writing file");
  std::fs::write(path, content).map_err(|source| SetupError::Write {
    path: path.to_path_buf(),
    source,
  })
}
