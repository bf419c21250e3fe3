//! Rendering the generated Ruby files.

use std::path::Path;

use crate::consts::{MODULE_EXT, WRAPPER_EXT};

/// Prelude of `util.rb`: remembers the entries of `PATH` and defines
/// `add_path`, which prepends a directory unless it is already listed.
const UTIL_PRELUDE: &str = r##"paths = ENV["PATH"].split(';')
add_path = Proc.new do |path|
  win_path = path.tr('/', '\\')
  unless paths.include?(win_path)
    ENV["PATH"] = "#{win_path};#{ENV['PATH']}"
    paths.unshift(win_path)
  end
end
"##;

/// Quote `value` as a double-quoted Ruby literal, escaping what
/// `String#dump` escapes.
pub fn ruby_string_literal(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');

  let mut chars = value.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\x0c' => out.push_str("\\f"),
      '\x0b' => out.push_str("\\v"),
      '\x08' => out.push_str("\\b"),
      '\x07' => out.push_str("\\a"),
      '\x1b' => out.push_str("\\e"),
      '#' if matches!(chars.peek(), Some('{' | '$' | '@')) => out.push_str("\\#"),
      c if c.is_ascii_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
      c if (c as u32) > 0xFFFF => out.push_str(&format!("\\u{{{:X}}}", c as u32)),
      c if !c.is_ascii() => out.push_str(&format!("\\u{:04X}", c as u32)),
      c => out.push(c),
    }
  }

  out.push('"');
  out
}

fn path_literal(path: &Path) -> String {
  ruby_string_literal(&path.to_string_lossy())
}

/// `add_path.call("<dir>")`
pub fn add_path_call(dir: &Path) -> String {
  format!("add_path.call({})", path_literal(dir))
}

/// `util.rb` prepending `dirs` in order.
pub fn render_util<'a, I>(dirs: I) -> String
where
  I: IntoIterator<Item = &'a Path>,
{
  let mut out = String::from(UTIL_PRELUDE);
  out.push('\n');
  for dir in dirs {
    out.push_str(&add_path_call(dir));
    out.push('\n');
  }
  out
}

/// Wrapper that requires the helper `util_name` next to it, then loads the
/// compiled module named like the wrapper itself from `dll_dir`.
pub fn render_wrapper(util_name: &str, dll_dir: &Path) -> String {
  format!(
    "require File.join(File.dirname(__FILE__), {util})\n\
     require File.join({dll_dir}, File.basename(__FILE__, '.{wrapper_ext}')) + '.{module_ext}'\n",
    util = ruby_string_literal(util_name),
    dll_dir = path_literal(dll_dir),
    wrapper_ext = WRAPPER_EXT,
    module_ext = MODULE_EXT,
  )
}
