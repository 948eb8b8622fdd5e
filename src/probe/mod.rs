//! Host environment probing.
//!
//! Decides, for each declared tool, whether it is present and acceptable
//! on this machine. The result is a [`FoundMap`] that later steps read but
//! never modify.
//!
//! # Modules
//!
//! - [`spec`] - Declarative tool descriptions and version targets
//! - [`prober`] - The detection procedure
//! - [`result`] - Per-tool results and the found-map
//! - [`fallback`] - Ordered "first success wins" search
//! - [`host`] - The machine seam used by the prober
//!
//! # Example
//!
//! ```no_run
//! use amplify_setup::probe::{default_specs, EnvironmentProber, SystemHost, VersionTargetList};
//!
//! let host = SystemHost::new();
//! let specs = default_specs(&VersionTargetList::new(["2.7", "2.6"]));
//! let found = EnvironmentProber::new(&host).probe(&specs);
//! if let Some(python) = found.invocation("python") {
//!     println!("using {}", python);
//! }
//! ```

pub mod fallback;
pub mod host;
pub mod prober;
pub mod result;
pub mod spec;

pub use fallback::{first_hit, FallbackChain};
pub use host::{Host, SystemHost};
pub use prober::EnvironmentProber;
pub use result::{FoundEntry, FoundMap, ProbeResult};
pub use spec::{
    candidates_for, default_specs, Check, CommandSpec, HostQuery, VersionTargetList, INTERPRETER,
    INTERPRETER_HEADERS,
};
