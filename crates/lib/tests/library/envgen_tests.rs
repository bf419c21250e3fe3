//! End-to-end generation of the Ruby test environment.

use std::path::PathBuf;

use svntest_lib::envgen::ruby::add_path_call;
use svntest_lib::{EnvironmentGenerator, SearchPath, setup_test_environment};

use super::common::SourceTree;

#[test]
fn generates_one_wrapper_per_swig_section() {
  let tree = SourceTree::new();

  let generated = setup_test_environment(&tree.top_dir, &tree.base_dir, &tree.ext_dir()).unwrap();

  assert_eq!(generated.modules, ["core", "fs", "repos"]);
  for module in &generated.modules {
    let wrapper = tree.ext_dir().join(format!("{}.rb", module));
    assert!(wrapper.is_file(), "{} should exist", wrapper.display());
  }
  assert!(!tree.ext_dir().join("swig_lib.rb").exists());
}

#[test]
fn util_prepends_paths_in_generation_order() {
  let tree = SourceTree::new().with_gen_make_opts();

  let generated = setup_test_environment(&tree.top_dir, &tree.base_dir, &tree.ext_dir()).unwrap();

  let dll_dir = tree.top_dir.join("Release").join("subversion").join("bindings").join("swig").join("ruby");
  let svn = tree.subversion_build_dir();
  let expected: Vec<PathBuf> = vec![
    dll_dir.clone(),
    dll_dir.join("libsvn_swig_ruby"),
    tree.top_dir.join("deps").join("apr").join("Release"),
    tree.top_dir.join("deps").join("apr-util").join("Release"),
    tree.top_dir.join("apr-iconv").join("Release"),
    tree.top_dir.join("berkeley-db").join("bin"),
    tree.top_dir.join("deps").join("sqlite-amalgamation").join("bin"),
    svn.join("libsvn_subr"),
    svn.join("libsvn_delta"),
    svn.join("libsvn_fs"),
    svn.join("libsvn_repos"),
    svn.join("libsvn_swig_ruby"),
    svn.join("libsvn_core"),
    svn.join("libsvn_fs"),
    svn.join("libsvn_repos"),
    svn.join("svnserve"),
  ];
  assert_eq!(generated.library_dirs, expected);

  let util = std::fs::read_to_string(&generated.util_path).unwrap();
  let calls: Vec<&str> = util.lines().filter(|line| line.starts_with("add_path.call(")).collect();
  let expected_calls: Vec<String> = expected.iter().map(|dir| add_path_call(dir)).collect();
  assert_eq!(calls, expected_calls);
}

#[test]
fn fs_wrapper_loads_fs_module_from_build_output() {
  let tree = SourceTree::new();

  let generated = setup_test_environment(&tree.top_dir, &tree.base_dir, &tree.ext_dir()).unwrap();

  let wrapper = std::fs::read_to_string(tree.ext_dir().join("fs.rb")).unwrap();
  let lines: Vec<&str> = wrapper.lines().collect();
  assert_eq!(lines.len(), 2);
  assert_eq!(lines[0], "require File.join(File.dirname(__FILE__), \"util\")");
  let dll_dir = svntest_lib::envgen::ruby::ruby_string_literal(&generated.layout.dll_dir.to_string_lossy());
  assert_eq!(
    lines[1],
    format!("require File.join({}, File.basename(__FILE__, '.rb')) + '.so'", dll_dir)
  );
}

#[test]
fn generation_is_repeatable() {
  let tree = SourceTree::new();
  let generator = EnvironmentGenerator::new(&tree.top_dir, &tree.base_dir, tree.ext_dir());

  let first = generator.generate().unwrap();
  let util_before = std::fs::read_to_string(&first.util_path).unwrap();
  let second = generator.generate().unwrap();

  assert_eq!(first, second);
  assert_eq!(std::fs::read_to_string(&second.util_path).unwrap(), util_before);
}

#[test]
fn build_type_selects_output_directory() {
  let tree = SourceTree::new();

  let generated = EnvironmentGenerator::new(&tree.top_dir, &tree.base_dir, tree.ext_dir())
    .with_build_type("Debug")
    .generate()
    .unwrap();

  assert!(generated.layout.dll_dir.starts_with(tree.top_dir.join("Debug")));
  assert_eq!(generated.library_dirs[2], tree.top_dir.join("apr").join("Debug"));
}

#[test]
fn search_path_applies_generated_dirs_once() {
  let tree = SourceTree::new();
  let dirs = EnvironmentGenerator::new(&tree.top_dir, &tree.base_dir, tree.ext_dir())
    .library_dirs()
    .unwrap();

  let mut path = SearchPath::parse("C:\\Windows\\system32;C:\\Windows");
  path.prepend_all(dirs.iter().map(|dir| dir.to_string_lossy()));

  // libsvn_fs and libsvn_repos are listed twice but only added once.
  let unique: std::collections::BTreeSet<&String> = path.entries().iter().collect();
  assert_eq!(unique.len(), path.entries().len());
  assert_eq!(path.entries().len(), dirs.len() - 2 + 2);
  assert_eq!(path.entries().last().map(String::as_str), Some("C:\\Windows"));
}
