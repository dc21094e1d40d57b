use crate::setup::fetch::{FetchError, Transport};
use std::io::{self, Read};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum VersionError {
    #[error("could not check version, make sure you have an internet connection ({0})")]
    Network(#[source] FetchError),
    #[error("could not read version check response ({0})")]
    Read(#[source] io::Error),
    #[error("version `{0}` not supported, make sure you have the latest version")]
    Unsupported(String),
}

/// Whether `runtime` resolves to an executable on `PATH`.
pub fn is_runtime_installed(runtime: &str) -> bool {
    match which::which(runtime) {
        Ok(path) => {
            debug!(runtime, path = %path.display(), "runtime found");
            true
        }
        Err(_) => false,
    }
}

/// Fetches `url` and accepts only if the body mentions `version` anywhere.
///
/// The body is not required to be valid UTF-8.
pub fn check_version<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    version: &str,
) -> Result<(), VersionError> {
    let mut raw = vec![];
    transport
        .get(url)
        .map_err(VersionError::Network)?
        .read_to_end(&mut raw)
        .map_err(VersionError::Read)?;
    let body = String::from_utf8_lossy(&raw);

    debug!(body = body.trim(), "version response");
    if body.contains(version) {
        Ok(())
    } else {
        Err(VersionError::Unsupported(version.to_string()))
    }
}
