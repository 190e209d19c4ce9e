//! Union of allow lists across discovered settings files.

use std::path::{Path, PathBuf};

use crate::domain::{display_path, PermissionSet};
use crate::extract::extract_allow_permissions;

/// One input file that contributed at least one permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    /// Path relative to the search root, or absolute when outside it.
    pub display_path: String,
    /// Distinct permissions found in this file.
    pub count: usize,
}

/// Result of merging every discovered file.
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Files with a non-empty allow list, in input order.
    pub sources: Vec<SourceReport>,
    pub permissions: PermissionSet,
}

/// Extract and union the allow lists of `files`.
///
/// Files that fail to read or parse contribute nothing (see
/// [`extract_allow_permissions`]). Files with an empty allow list are not
/// listed in [`MergeReport::sources`].
pub fn merge_permissions(files: &[PathBuf], root: &Path) -> MergeReport {
    let mut report = MergeReport::default();

    for file in files {
        let permissions = extract_allow_permissions(file);
        if permissions.is_empty() {
            continue;
        }

        report.sources.push(SourceReport {
            display_path: display_path(file, root),
            count: permissions.len(),
        });
        report.permissions.extend_from(&permissions);
    }

    report
}
