//! Settings document abstraction layer.
//!
//! `SettingsDocument` wraps a top-level JSON object so the rest of the
//! settings module never touches `serde_json::Map` plumbing directly.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::repair::strip_trailing_commas;
use super::SettingsError;
use crate::domain::{Permission, PermissionSet};

const PERMISSIONS: &str = "permissions";

/// How the existing document text was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParseOutcome {
    /// Parsed as written.
    Clean,
    /// Parsed after stripping trailing commas.
    Repaired,
}

/// A settings document bound to the path it is read from and written to.
///
/// Top-level key order is preserved; keys other than `permissions` are
/// carried through untouched.
#[derive(Debug)]
pub(super) struct SettingsDocument {
    path: PathBuf,
    root: Map<String, Value>,
}

impl SettingsDocument {
    /// An empty document that will be written to `path`.
    pub(super) fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            root: Map::new(),
        }
    }

    /// Load `path` if it exists.
    ///
    /// Returns `Ok(None)` when there is no file yet.
    pub(super) fn load(path: &Path) -> Result<Option<(Self, ParseOutcome)>, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(path, &content).map(Some)
    }

    /// Parse document text, retrying once with trailing commas stripped.
    ///
    /// When both attempts fail the error from the original text is
    /// returned, since its line and column refer to the file as written.
    pub(super) fn parse(
        path: &Path,
        content: &str,
    ) -> Result<(Self, ParseOutcome), SettingsError> {
        let (value, outcome) = match serde_json::from_str::<Value>(content) {
            Ok(value) => (value, ParseOutcome::Clean),
            Err(original) => match repair_and_parse(content) {
                Some(value) => (value, ParseOutcome::Repaired),
                None => {
                    return Err(SettingsError::Parse {
                        path: path.to_path_buf(),
                        source: original,
                    })
                }
            },
        };

        match value {
            Value::Object(root) => Ok((
                Self {
                    path: path.to_path_buf(),
                    root,
                },
                outcome,
            )),
            other => Err(shape_error(
                path,
                format!("top level is {}, expected an object", kind(&other)),
            )),
        }
    }

    /// The current `permissions.allow` entries.
    ///
    /// Missing `permissions` or `allow` is an empty set.
    pub(super) fn allow(&self) -> Result<PermissionSet, SettingsError> {
        let Some(permissions) = self.root.get(PERMISSIONS) else {
            return Ok(PermissionSet::new());
        };
        let Value::Object(permissions) = permissions else {
            return Err(self.shape(format!(
                "`{PERMISSIONS}` is {}, expected an object",
                kind(permissions)
            )));
        };
        let Some(allow) = permissions.get("allow") else {
            return Ok(PermissionSet::new());
        };
        let Value::Array(entries) = allow else {
            return Err(self.shape(format!(
                "`{PERMISSIONS}.allow` is {}, expected a list",
                kind(allow)
            )));
        };

        entries
            .iter()
            .map(|entry| match entry {
                Value::String(s) => Ok(Permission::new(s.as_str())),
                other => Err(self.shape(format!(
                    "`{PERMISSIONS}.allow` contains {}, expected only strings",
                    kind(other)
                ))),
            })
            .collect()
    }

    /// Replace `permissions.<key>` with `list`, creating `permissions` if absent.
    pub(super) fn set_list(&mut self, key: &str, list: Value) -> Result<(), SettingsError> {
        self.permissions_mut()?.insert(key.to_string(), list);
        Ok(())
    }

    /// Set `permissions.<key>` to `[]` unless it is already present.
    pub(super) fn default_list(&mut self, key: &str) -> Result<(), SettingsError> {
        self.permissions_mut()?
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()));
        Ok(())
    }

    /// Two-space indented JSON with a single trailing newline.
    pub(super) fn to_pretty_string(&self) -> Result<String, SettingsError> {
        let mut out = serde_json::to_string_pretty(&self.root)?;
        out.push('\n');
        Ok(out)
    }

    /// Overwrite the file at this document's path, creating parent directories.
    pub(super) fn save(&self) -> Result<(), SettingsError> {
        let content = self.to_pretty_string()?;
        let write_err = |source: std::io::Error| SettingsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, content).map_err(write_err)
    }

    fn permissions_mut(&mut self) -> Result<&mut Map<String, Value>, SettingsError> {
        let path = &self.path;
        match self
            .root
            .entry(PERMISSIONS)
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(map) => Ok(map),
            other => Err(shape_error(
                path,
                format!("`{PERMISSIONS}` is {}, expected an object", kind(other)),
            )),
        }
    }

    fn shape(&self, message: String) -> SettingsError {
        shape_error(&self.path, message)
    }
}

fn repair_and_parse(content: &str) -> Option<Value> {
    let fixed = strip_trailing_commas(content);
    if matches!(fixed, std::borrow::Cow::Borrowed(_)) {
        return None;
    }
    serde_json::from_str(&fixed).ok()
}

fn shape_error(path: &Path, message: String) -> SettingsError {
    SettingsError::Shape {
        path: path.to_path_buf(),
        message,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
