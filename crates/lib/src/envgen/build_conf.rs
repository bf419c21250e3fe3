//! Section headers of `build.conf`.
//!
//! Only two kinds of section matter here: `[libsvn_X]` libraries, whose
//! directories hold the DLLs, and `[swig_X]` modules, which get a wrapper.
//! Everything else in the file is ignored.

use std::path::Path;

use crate::error::{Result, SetupError};

const LIBRARY_PREFIX: &str = "libsvn_";
const BINDABLE_PREFIX: &str = "swig_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
  /// `[libsvn_X]`; the name keeps the `libsvn_` prefix.
  Library,
  /// `[swig_X]`; the name is `X`.
  BindableModule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfSection {
  pub kind: SectionKind,
  pub name: String,
}

impl BuildConfSection {
  fn library(name: &str) -> Self {
    Self {
      kind: SectionKind::Library,
      name: name.to_string(),
    }
  }

  fn bindable(name: &str) -> Self {
    Self {
      kind: SectionKind::BindableModule,
      name: name.to_string(),
    }
  }
}

/// Parse the recognized section headers, in file order.
pub fn parse_build_conf(content: &str) -> Vec<BuildConfSection> {
  content.lines().filter_map(parse_header).collect()
}

pub fn read_build_conf(path: &Path) -> Result<Vec<BuildConfSection>> {
  let content = std::fs::read_to_string(path).map_err(|source| SetupError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(parse_build_conf(&content))
}

/// Names of the `[libsvn_X]` sections.
pub fn libraries(sections: &[BuildConfSection]) -> impl Iterator<Item = &str> {
  names_of(sections, SectionKind::Library)
}

/// Names of the `[swig_X]` sections, without the prefix.
pub fn bindable_modules(sections: &[BuildConfSection]) -> impl Iterator<Item = &str> {
  names_of(sections, SectionKind::BindableModule)
}

fn names_of(sections: &[BuildConfSection], kind: SectionKind) -> impl Iterator<Item = &str> {
  sections
    .iter()
    .filter(move |section| section.kind == kind)
    .map(|section| section.name.as_str())
}

fn parse_header(line: &str) -> Option<BuildConfSection> {
  let name = line.trim_end().strip_prefix('[')?.strip_suffix(']')?;

  if name.len() > LIBRARY_PREFIX.len() && name.starts_with(LIBRARY_PREFIX) {
    return Some(BuildConfSection::library(name));
  }

  match name.strip_prefix(BINDABLE_PREFIX) {
    Some(module) if !module.is_empty() => Some(BuildConfSection::bindable(module)),
    _ => None,
  }
}
