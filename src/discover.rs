//! Discovery of per-project `.claude/settings.local.json` files.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory that holds Claude settings inside a project.
pub const SETTINGS_DIR: &str = ".claude";

/// File name of the per-project local settings.
pub const LOCAL_SETTINGS_FILE: &str = "settings.local.json";

/// Errors that prevent discovery from starting.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DiscoverError {
    #[error("directory '{}' does not exist", .0.display())]
    #[diagnostic(code(discover::not_found))]
    NotFound(PathBuf),
    #[error("'{}' is not a directory", .0.display())]
    #[diagnostic(code(discover::not_a_directory))]
    NotADirectory(PathBuf),
}

/// Check that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> Result<(), DiscoverError> {
    if !root.exists() {
        return Err(DiscoverError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DiscoverError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Find every `**/.claude/settings.local.json` beneath `root`, sorted by path.
///
/// Matches at any depth, including `root/.claude/settings.local.json`
/// itself. Hidden directories are traversed; symlinked directories are not,
/// so a project reachable through a link is found once and link cycles
/// cannot stall the walk. Entries that cannot be read during the walk are
/// skipped with a warning. An empty result is not an error.
pub fn find_settings_files(root: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    validate_root(root)?;
    debug!(root = %root.display(), "searching for settings files");

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    path = %e.path().unwrap_or(root).display(),
                    error = %e,
                    "skipping unreadable directory entry"
                );
                continue;
            }
        };

        if !is_local_settings(&entry) {
            continue;
        }
        if is_regular_file(&entry) {
            files.push(entry.into_path());
        } else {
            debug!(path = %entry.path().display(), "skipping non-file match");
        }
    }

    files.sort();
    Ok(files)
}

/// Whether `entry` is named `settings.local.json` inside a `.claude` directory.
fn is_local_settings(entry: &DirEntry) -> bool {
    entry.file_name() == LOCAL_SETTINGS_FILE
        && entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|dir| dir == SETTINGS_DIR)
}

/// Regular files, and symlinks that resolve to one.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch_settings(root: &Path, project: &str) -> PathBuf {
        let dir = root.join(project).join(SETTINGS_DIR);
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join(LOCAL_SETTINGS_FILE);
        fs::write(&file, "{}").unwrap();
        file
    }

    #[test]
    fn finds_nested_files_sorted() {
        let tmp = tempdir().unwrap();
        let b = touch_settings(tmp.path(), "b");
        let a = touch_settings(tmp.path(), "a/deep/er");
        let c = touch_settings(tmp.path(), "c");

        let found = find_settings_files(tmp.path()).unwrap();
        assert_eq!(found, vec![a, b, c]);
    }

    #[test]
    fn finds_file_directly_under_root() {
        let tmp = tempdir().unwrap();
        let top = touch_settings(tmp.path(), "");

        let found = find_settings_files(tmp.path()).unwrap();
        assert_eq!(found, vec![top]);
    }

    #[test]
    fn traverses_hidden_directories() {
        let tmp = tempdir().unwrap();
        let hidden = touch_settings(tmp.path(), ".hidden/project");

        let found = find_settings_files(tmp.path()).unwrap();
        assert_eq!(found, vec![hidden]);
    }

    #[test]
    fn ignores_other_file_names() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("p").join(SETTINGS_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("settings.json"), "{}").unwrap();
        fs::write(tmp.path().join("p").join(LOCAL_SETTINGS_FILE), "{}").unwrap();

        assert!(find_settings_files(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn ignores_directory_with_settings_name() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join(SETTINGS_DIR).join(LOCAL_SETTINGS_FILE)).unwrap();

        assert!(find_settings_files(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn empty_tree_is_not_an_error() {
        let tmp = tempdir().unwrap();
        assert!(find_settings_files(tmp.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_project_is_found_once() {
        let tmp = tempdir().unwrap();
        let real = touch_settings(tmp.path(), "real");
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("alias")).unwrap();

        assert_eq!(find_settings_files(tmp.path()).unwrap(), vec![real]);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycles_do_not_stall_the_walk() {
        let tmp = tempdir().unwrap();
        let file = touch_settings(tmp.path(), "p");
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("p/l1")).unwrap();
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("p/l2")).unwrap();

        assert_eq!(find_settings_files(tmp.path()).unwrap(), vec![file]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_settings_file_is_found() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("shared.json");
        fs::write(&target, "{}").unwrap();
        let dir = tmp.path().join("p").join(SETTINGS_DIR);
        fs::create_dir_all(&dir).unwrap();
        let link = dir.join(LOCAL_SETTINGS_FILE);
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(find_settings_files(tmp.path()).unwrap(), vec![link]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_root_is_searched() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempdir().unwrap();
        let root = tmp.path().join(OsStr::from_bytes(b"caf\xe9"));
        fs::create_dir_all(&root).unwrap();
        let file = touch_settings(&root, "proj");

        assert_eq!(find_settings_files(&root).unwrap(), vec![file]);
    }

    #[test]
    fn root_with_bracket_characters_is_searched() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("weird[1]");
        fs::create_dir_all(&root).unwrap();
        let file = touch_settings(&root, "proj");

        assert_eq!(find_settings_files(&root).unwrap(), vec![file]);
    }

    #[test]
    fn missing_root_returns_not_found() {
        let tmp = tempdir().unwrap();
        let result = find_settings_files(&tmp.path().join("nope"));
        assert!(matches!(result.unwrap_err(), DiscoverError::NotFound(_)));
    }

    #[test]
    fn file_root_returns_not_a_directory() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let result = find_settings_files(&file);
        assert!(matches!(result.unwrap_err(), DiscoverError::NotADirectory(_)));
    }
}
