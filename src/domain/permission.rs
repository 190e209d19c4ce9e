use std::collections::BTreeSet;

/// A single permission token from a `permissions.allow` list.
///
/// Opaque to this tool: `Read(*.py)` and `Bash(git status:*)` are compared
/// by exact string equality only. Ordering is lexicographic on the raw
/// string, which is what makes written lists deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Permission(pub(crate) String);

impl Permission {
    pub fn new(raw: impl Into<String>) -> Self {
        Permission(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Permission {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Permission {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deduplicated, lexicographically ordered set of permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add every permission of `other` to `self`.
    pub fn extend_from(&mut self, other: &PermissionSet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Permissions in `self` that are not in `other`.
    pub fn difference(&self, other: &PermissionSet) -> PermissionSet {
        PermissionSet(self.0.difference(&other.0).cloned().collect())
    }

    /// Iterate in ascending lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    /// The set as a sorted JSON array of strings.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.0
                .iter()
                .map(|p| serde_json::Value::String(p.0.clone()))
                .collect(),
        )
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        PermissionSet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Permission::new).collect()
    }
}
