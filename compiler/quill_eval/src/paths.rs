//! Lexical path handling shared by the loader, policy and file builtins.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` without touching the filesystem.
///
/// `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                );
                if !at_root && out.components().next_back() != Some(Component::ParentDir) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Expand a leading `~` to `$HOME`.
pub fn expand_home(text: &str) -> PathBuf {
    if let Some(rest) = text.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    } else if text == "~" {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home);
        }
    }
    PathBuf::from(text)
}

/// Absolute, normalized form of `text` relative to `base`.
pub fn resolve(text: &str, base: &Path) -> PathBuf {
    let path = expand_home(text);
    if path.is_absolute() {
        normalize(&path)
    } else {
        normalize(&base.join(path))
    }
}

/// `@-`, `@stdin`, `@stdout` and `@stderr` name the process streams.
pub fn is_stdio(text: &str) -> bool {
    matches!(text, "-" | "stdin" | "stdout" | "stderr")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_removes_dots() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn resolve_against_base() {
        assert_eq!(
            resolve("./lib/util.quill", Path::new("/proj/src")),
            PathBuf::from("/proj/src/lib/util.quill")
        );
        assert_eq!(resolve("../x", Path::new("/proj/src")), PathBuf::from("/proj/x"));
        assert_eq!(resolve("/abs/y", Path::new("/proj")), PathBuf::from("/abs/y"));
    }

    #[test]
    fn stdio_names() {
        assert!(is_stdio("-"));
        assert!(is_stdio("stdout"));
        assert!(!is_stdio("./stdout"));
    }
}
