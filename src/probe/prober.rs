//! The environment prober.
//!
//! Walks an ordered list of [`CommandSpec`]s against a [`Host`] and builds
//! the immutable [`FoundMap`]. Probing never installs or mutates anything,
//! and a missing tool is a normal `found = false` outcome.

use std::path::PathBuf;

use super::fallback::first_hit;
use super::host::Host;
use super::result::{FoundEntry, FoundMap, ProbeResult};
use super::spec::{candidates_for, Check, CommandSpec, HostQuery, VersionTargetList};

/// Detects which of the declared tools are usable on a host.
pub struct EnvironmentProber<'h> {
    host: &'h dyn Host,
}

impl<'h> EnvironmentProber<'h> {
    pub fn new(host: &'h dyn Host) -> Self {
        Self { host }
    }

    /// Probe every spec in order.
    ///
    /// Always returns one entry per spec. Dependent specs see the results
    /// of specs declared before them.
    pub fn probe(&self, specs: &[CommandSpec]) -> FoundMap {
        let mut entries: Vec<FoundEntry> = Vec::with_capacity(specs.len());

        for spec in specs {
            let result = match &spec.check {
                Check::Exists { candidates } => self.probe_exists(candidates),
                Check::Versioned {
                    family,
                    targets,
                    version_query,
                } => self.probe_versioned(family, targets, version_query),
                Check::Dependent {
                    depends_on,
                    path_query,
                } => {
                    let gate = entries
                        .iter()
                        .find(|e| &e.name == depends_on)
                        .map(|e| &e.result);
                    self.probe_dependent(depends_on, gate, path_query)
                }
            };

            tracing::debug!(
                "probe {}: found={} invocation={:?}",
                spec.name,
                result.found,
                result.invocation
            );
            entries.push(FoundEntry {
                name: spec.name.clone(),
                result,
            });
        }

        FoundMap::from_entries(entries)
    }

    fn probe_exists(&self, candidates: &[String]) -> ProbeResult {
        let hit = first_hit(candidates, |name| self.host.resolve(name));
        if hit.is_some() {
            ProbeResult::present()
        } else {
            ProbeResult::missing()
        }
    }

    /// Nested search flattened into one ordered scan of
    /// `(version, candidate)` pairs: preferred versions first, most
    /// specific names first within a version. The first pair whose
    /// command resolves and reports exactly that version wins.
    fn probe_versioned(
        &self,
        family: &str,
        targets: &VersionTargetList,
        query: &HostQuery,
    ) -> ProbeResult {
        let pairs = targets.iter().flat_map(|version| {
            candidates_for(family, version)
                .into_iter()
                .map(move |candidate| (version, candidate))
        });

        let hit = first_hit(pairs, |(version, candidate)| {
            self.host.resolve(&candidate)?;
            let reported = self.host.query(&candidate, &query.args)?;
            if reported == version {
                Some((candidate, version))
            } else {
                tracing::debug!(
                    "{} reports {:?}, wanted {:?}",
                    candidate,
                    reported,
                    version
                );
                None
            }
        });

        match hit {
            Some((invocation, version)) => ProbeResult::resolved(&invocation, version),
            None => ProbeResult::missing(),
        }
    }

    fn probe_dependent(
        &self,
        depends_on: &str,
        gate: Option<&ProbeResult>,
        query: &HostQuery,
    ) -> ProbeResult {
        let Some(invocation) = gate
            .filter(|g| g.found)
            .and_then(|g| g.invocation.as_deref())
        else {
            tracing::debug!("skipping probe gated on '{}'", depends_on);
            return ProbeResult::missing();
        };

        let Some(answer) = self.host.query(invocation, &query.args) else {
            return ProbeResult::missing();
        };
        if answer.is_empty() || answer == "None" {
            return ProbeResult::missing();
        }

        let mut path = PathBuf::from(answer);
        if let Some(relative) = &query.append {
            path.push(relative);
        }

        if self.host.path_exists(&path) {
            ProbeResult::present()
        } else {
            ProbeResult::missing()
        }
    }
}
