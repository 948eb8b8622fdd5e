//! Declarative descriptions of the commands to probe for.

use serde::{Deserialize, Serialize};

/// Ordered list of acceptable interpreter versions.
///
/// Order encodes preference: the first entry is tried first, and the
/// first version that yields a working candidate wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTargetList(Vec<String>);

impl VersionTargetList {
    pub fn new<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(versions.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Human-readable list for "Checking if ..." lines, e.g. `2.6 or 2.7`.
    pub fn describe(&self) -> String {
        let mut sorted: Vec<&str> = self.iter().collect();
        sorted.sort_unstable();
        sorted.join(" or ")
    }
}

/// A query run against a resolved invocation.
///
/// The invocation is executed with `args`; trimmed stdout is the answer.
/// When `append` is set, the answer is treated as a directory and the
/// relative path is joined to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostQuery {
    pub args: Vec<String>,
    pub append: Option<String>,
}

impl HostQuery {
    pub fn new(args: &[&str]) -> Self {
        Self {
            args: args.iter().map(|a| a.to_string()).collect(),
            append: None,
        }
    }

    pub fn joined_with(mut self, relative: &str) -> Self {
        self.append = Some(relative.to_string());
        self
    }
}

/// How a single logical tool is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Found iff one of the candidates resolves to a runnable command.
    Exists { candidates: Vec<String> },

    /// Nested version/name search for an interpreter.
    Versioned {
        /// Bare command family, e.g. `python`.
        family: String,
        targets: VersionTargetList,
        /// Query whose output must equal the target version exactly.
        version_query: HostQuery,
    },

    /// Gated on another probe; never runs anything when the gate is closed.
    Dependent {
        depends_on: String,
        /// Introspection run through the dependency's resolved invocation.
        /// Found iff the resulting path exists on disk.
        path_query: HostQuery,
    },
}

/// A candidate tool to detect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Logical name used as the found-map key, e.g. `python-dev`.
    pub name: String,
    pub check: Check,
}

impl CommandSpec {
    /// A plain existence check for a single command of the same name.
    pub fn exists(name: &str) -> Self {
        Self {
            name: name.to_string(),
            check: Check::Exists {
                candidates: vec![name.to_string()],
            },
        }
    }

    pub fn versioned(name: &str, family: &str, targets: VersionTargetList, query: HostQuery) -> Self {
        Self {
            name: name.to_string(),
            check: Check::Versioned {
                family: family.to_string(),
                targets,
                version_query: query,
            },
        }
    }

    pub fn dependent(name: &str, depends_on: &str, path_query: HostQuery) -> Self {
        Self {
            name: name.to_string(),
            check: Check::Dependent {
                depends_on: depends_on.to_string(),
                path_query,
            },
        }
    }

    /// Text shown in the "Checking if ... exists" line.
    pub fn label(&self) -> String {
        match &self.check {
            Check::Versioned {
                family, targets, ..
            } => format!("{} {}", family, targets.describe()),
            _ => self.name.clone(),
        }
    }
}

/// Found-map key of the interpreter probe.
pub const INTERPRETER: &str = "python";

/// Found-map key of the interpreter's development headers.
pub const INTERPRETER_HEADERS: &str = "python-dev";

/// Invocation-name candidates for one target version.
///
/// For `python` and `2.7` this yields `python2.7`, `python2`, `python`:
/// the full version, the major version only, then the bare name.
pub fn candidates_for(family: &str, version: &str) -> Vec<String> {
    let major = version.split('.').next().unwrap_or(version);
    let mut out: Vec<String> = Vec::with_capacity(3);
    for name in [
        format!("{}{}", family, version),
        format!("{}{}", family, major),
        family.to_string(),
    ] {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Query printing `major.minor` of a Python interpreter.
pub fn python_version_query() -> HostQuery {
    HostQuery::new(&[
        "-c",
        "import sys; print('%d.%d' % (sys.version_info[0], sys.version_info[1]))",
    ])
}

/// Query locating `Python.h` through the interpreter's include directory.
pub fn python_header_query() -> HostQuery {
    HostQuery::new(&[
        "-c",
        "from distutils import sysconfig; print(sysconfig.get_config_var('INCLUDEPY'))",
    ])
    .joined_with("Python.h")
}

/// The probe list used by the installer, in declaration order.
///
/// Installs follow this order, so the interpreter comes before its
/// headers and the build tools.
pub fn default_specs(targets: &VersionTargetList) -> Vec<CommandSpec> {
    vec![
        CommandSpec::versioned(INTERPRETER, "python", targets.clone(), python_version_query()),
        CommandSpec::dependent(INTERPRETER_HEADERS, INTERPRETER, python_header_query()),
        CommandSpec::exists("git"),
        CommandSpec::exists("wget"),
        CommandSpec::exists("curl"),
        CommandSpec::exists("gcc"),
    ]
}
