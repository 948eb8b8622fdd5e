//! The provisioning workflow.

pub mod workflow;

pub use workflow::{SetupOptions, SetupReport, Workflow, API_KEY_KEY, CONFIRM_KEY};
