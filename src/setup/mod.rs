pub mod archive;
pub mod fetch;

use crate::config::Config;
use archive::{extract_file_from_zip, ArchiveError};
use fetch::{download_file, FetchError, Transport};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("could not create patcher directory `{0}`: {1}")]
    CreateDir(PathBuf, #[source] io::Error),
    #[error("could not download patcher: {0}")]
    Download(#[source] FetchError),
    #[error("could not extract {0}: {1}")]
    Extract(String, #[source] ArchiveError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelperStatus {
    AlreadyPresent,
    Installed,
}

/// Presence is the only check made on an installed helper.
pub fn helper_present(config: &Config) -> bool {
    config.helper_path().is_file()
}

/// Downloads the release archive and extracts the helper from it unless the
/// helper is already in place.
pub fn ensure_helper_exists<T: Transport + ?Sized>(
    config: &Config,
    transport: &T,
) -> Result<HelperStatus, SetupError> {
    if helper_present(config) {
        debug!(path = %config.helper_path().display(), "helper already present");
        return Ok(HelperStatus::AlreadyPresent);
    }

    let helper = config.helper_path();
    if let Some(dir) = helper.parent() {
        fs::create_dir_all(dir).map_err(|e| SetupError::CreateDir(dir.to_path_buf(), e))?;
    }

    let archive = TempArchive::new(config.archive_path());
    download_file(transport, &config.release_url, archive.path()).map_err(SetupError::Download)?;
    extract_file_from_zip(archive.path(), &config.release_entry, &helper)
        .map_err(|e| SetupError::Extract(config.release_entry.clone(), e))?;

    info!(path = %helper.display(), "helper installed");
    Ok(HelperStatus::Installed)
}

/// Downloaded archive that is removed once the guard goes out of scope.
struct TempArchive {
    path: PathBuf,
}

impl TempArchive {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArchive {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed downloaded archive"),
            Err(e) if e.kind() == ErrorKind::NotFound => (),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove downloaded archive"
            ),
        }
    }
}
