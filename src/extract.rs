//! Reading `permissions.allow` from one local settings file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::{Permission, PermissionSet};

/// Why a local settings file contributed nothing.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("error reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected settings layout in {}: {source}", .path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The subset of a local settings document this tool reads.
///
/// `allow` entries stay as raw values so a single non-string entry does not
/// discard the rest of the list.
#[derive(Debug, Default, Deserialize)]
struct LocalSettings {
    #[serde(default)]
    permissions: LocalPermissions,
}

#[derive(Debug, Default, Deserialize)]
struct LocalPermissions {
    #[serde(default)]
    allow: Vec<Value>,
}

/// Read `permissions.allow` from a local settings file.
///
/// A missing `permissions` object or `allow` list yields an empty set.
/// Non-string entries inside `allow` are skipped with a warning.
pub fn read_allow_permissions(path: &Path) -> Result<PermissionSet, ExtractError> {
    let content = std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|source| ExtractError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let settings: LocalSettings =
        serde_json::from_value(value).map_err(|source| ExtractError::Shape {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(collect_strings(path, settings.permissions.allow))
}

/// Like [`read_allow_permissions`], but a failing file contributes nothing.
///
/// The failure is reported as a warning naming the file; the run continues.
pub fn extract_allow_permissions(path: &Path) -> PermissionSet {
    match read_allow_permissions(path) {
        Ok(permissions) => permissions,
        Err(e) => {
            warn!("{e}");
            PermissionSet::new()
        }
    }
}

fn collect_strings(path: &Path, entries: Vec<Value>) -> PermissionSet {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(Permission::new(s)),
            other => {
                warn!(
                    path = %path.display(),
                    entry = %other,
                    "skipping non-string allow entry"
                );
                None
            }
        })
        .collect()
}
