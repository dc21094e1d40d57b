pub mod config;
pub mod orchestrator;
pub mod patch;
pub mod preflight;
pub mod report;
pub mod scan;
pub mod select;
pub mod setup;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use orchestrator::{exit_status, Orchestrator, Outcome, RunError, Stage};
pub use patch::{ExternalPatcher, PatchError, Patcher};
pub use setup::fetch::{FetchError, HttpTransport, Transport};

/// Token the version endpoint must contain for this build to run.
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
