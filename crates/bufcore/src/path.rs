use std::path::{Component, Path, PathBuf};

/// Lexically cleans a path without touching the filesystem.
///
/// Drops `.` components and redundant separators and folds `..` into the
/// preceding normal component. A `..` directly under the root is dropped; a
/// leading `..` in a relative path is kept. An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => cleaned.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    cleaned.pop();
                    depth -= 1;
                } else if !cleaned.has_root() {
                    cleaned.push("..");
                }
            }
            Component::Normal(part) => {
                cleaned.push(part);
                depth += 1;
            }
        }
    }

    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}
