use std::path::{Component, Path, PathBuf};

/// A normalized absolute path.
///
/// Relative paths are resolved against cwd and `..`/`.` components are
/// collapsed logically (no filesystem access, symlinks are left alone).
///
/// Constructed via [`NormalizedPath::new`], which never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath(pub(crate) PathBuf);

impl NormalizedPath {
    /// Normalize `raw` against `cwd`.
    ///
    /// Steps:
    /// 1. Prepend `cwd` if `raw` is relative
    /// 2. Drop `.` components
    /// 3. Let `..` pop the previous normal component (never above the root)
    pub fn new(raw: &Path, cwd: &Path) -> Self {
        let joined = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            cwd.join(raw)
        };

        let mut result = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if matches!(result.components().next_back(), Some(Component::Normal(_))) {
                        result.pop();
                    }
                }
                other => result.push(other.as_os_str()),
            }
        }

        NormalizedPath(result)
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

/// How a discovered file is shown in progress output.
///
/// Relative to `root` when the file lives under it, otherwise the path as-is.
pub fn display_path(file: &Path, root: &Path) -> String {
    match file.strip_prefix(root) {
        Ok(relative) => relative.display().to_string(),
        Err(_) => file.display().to_string(),
    }
}
