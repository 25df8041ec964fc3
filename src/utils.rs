//! Utility functions for path handling and command templates

use std::path::Path;

/// Convert a path to Git format (always forward slashes)
///
/// Git expects paths with forward slashes, even on Windows.
/// This function converts backslashes to forward slashes for use in Git commands.
pub fn path_to_git_format(path: &Path) -> String {
  // On Windows, convert backslashes to forward slashes
  // On Unix, this is a no-op since paths already use forward slashes
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Replace `{key}` placeholders in a template
///
/// Unknown placeholders are left untouched.
pub fn expand_placeholders(template: &str, vars: &[(&str, &str)]) -> String {
  let mut out = template.to_string();
  for (key, value) in vars {
    out = out.replace(&format!("{{{}}}", key), value);
  }
  out
}
