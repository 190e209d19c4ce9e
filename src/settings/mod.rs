//! The output settings file: load, merge `permissions.allow`, write back.

mod document;
mod repair;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::PermissionSet;
use document::{ParseOutcome, SettingsDocument};

/// Errors that abort an update of the output settings file.
///
/// Errors raised while loading leave the output file untouched.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SettingsError {
    #[error("failed to read existing settings {}: {source}", .path.display())]
    #[diagnostic(code(settings::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse existing settings {}: {source}", .path.display())]
    #[diagnostic(
        code(settings::parse),
        help("fix the JSON syntax by hand; only trailing commas are repaired automatically")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected settings layout in {}: {message}", .path.display())]
    #[diagnostic(
        code(settings::shape),
        help("`permissions` must be an object and `permissions.allow` a list of strings")
    )]
    Shape { path: PathBuf, message: String },
    #[error("failed to write settings {}: {source}", .path.display())]
    #[diagnostic(code(settings::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    #[diagnostic(code(settings::serialize))]
    Serialize(#[from] serde_json::Error),
}

/// The output settings file as loaded, before anything is written.
///
/// Loading and saving are separate steps so callers can report what was
/// found (and whether it needed repair) even if the write later fails.
#[derive(Debug)]
pub struct OutputSettings {
    doc: SettingsDocument,
    existed: bool,
    repaired: bool,
    existing_allow: PermissionSet,
}

/// What [`OutputSettings::merge_and_save`] changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Incoming permissions that were not already allowed.
    pub added: usize,
    /// Entries in `permissions.allow` after the merge.
    pub total: usize,
}

impl OutputSettings {
    /// Load the settings at `output`, or start an empty document if there is
    /// no file yet.
    ///
    /// Trailing commas are repaired. A document that cannot be parsed even
    /// after repair, or whose `permissions.allow` is not a list of strings,
    /// is an error and nothing is written.
    pub fn load(output: &Path) -> Result<Self, SettingsError> {
        let (doc, existed, repaired) = match SettingsDocument::load(output)? {
            Some((doc, outcome)) => {
                let repaired = outcome == ParseOutcome::Repaired;
                if repaired {
                    warn!(
                        path = %output.display(),
                        "repaired trailing commas in existing settings"
                    );
                }
                (doc, true, repaired)
            }
            None => {
                debug!(
                    path = %output.display(),
                    "no existing settings, creating a new file"
                );
                (SettingsDocument::empty(output), false, false)
            }
        };
        let existing_allow = doc.allow()?;

        Ok(Self {
            doc,
            existed,
            repaired,
            existing_allow,
        })
    }

    /// The output file existed before this run.
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// The existing file needed trailing commas stripped to parse.
    pub fn repaired(&self) -> bool {
        self.repaired
    }

    /// Entries in `permissions.allow` before the merge.
    pub fn existing_count(&self) -> usize {
        self.existing_allow.len()
    }

    /// Merge `permissions` into `permissions.allow` and write the file.
    ///
    /// `allow` becomes the sorted union of its old entries and
    /// `permissions`; `deny` and `ask` are kept, or set to `[]` when absent.
    /// Every other field is written back untouched.
    pub fn merge_and_save(
        mut self,
        permissions: &PermissionSet,
    ) -> Result<UpdateReport, SettingsError> {
        let added = permissions.difference(&self.existing_allow);

        let mut merged = self.existing_allow;
        merged.extend_from(permissions);

        self.doc.set_list("allow", merged.to_json())?;
        self.doc.default_list("deny")?;
        self.doc.default_list("ask")?;
        self.doc.save()?;

        Ok(UpdateReport {
            added: added.len(),
            total: merged.len(),
        })
    }
}
