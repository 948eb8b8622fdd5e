//! Probe results and the found-map.

use serde::Serialize;

/// Outcome of probing one logical tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub found: bool,
    /// The command that satisfied a versioned check, e.g. `python2.7`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation: Option<String>,
    /// The version target that invocation reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ProbeResult {
    pub fn missing() -> Self {
        Self {
            found: false,
            invocation: None,
            version: None,
        }
    }

    pub fn present() -> Self {
        Self {
            found: true,
            invocation: None,
            version: None,
        }
    }

    pub fn resolved(invocation: &str, version: &str) -> Self {
        Self {
            found: true,
            invocation: Some(invocation.to_string()),
            version: Some(version.to_string()),
        }
    }
}

/// One row of the found-map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundEntry {
    pub name: String,
    #[serde(flatten)]
    pub result: ProbeResult,
}

/// Immutable mapping of logical tool name to probe result.
///
/// Entries keep the declaration order of the probed specs. There is no
/// mutating API once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FoundMap {
    entries: Vec<FoundEntry>,
}

impl FoundMap {
    pub(crate) fn from_entries(entries: Vec<FoundEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ProbeResult> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.result)
    }

    /// Whether `name` was probed and found. Unknown names count as missing.
    pub fn is_found(&self, name: &str) -> bool {
        self.get(name).is_some_and(|r| r.found)
    }

    /// Resolved invocation for a versioned check, if it matched.
    pub fn invocation(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|r| r.invocation.as_deref())
    }

    /// Version reported by the resolved invocation of a versioned check.
    pub fn version(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|r| r.version.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoundEntry> {
        self.entries.iter()
    }

    /// Names of tools that were not found, in declaration order.
    pub fn missing(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.result.found)
            .map(|e| e.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
