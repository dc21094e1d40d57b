use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
#[error("could not read `{0}`: {1}")]
pub struct ScanError(PathBuf, #[source] io::Error);

/// Names of the non-directory entries in `dir` ending in `suffix`.
///
/// The comparison is case sensitive and the names come back in the order the
/// directory listing yields them.
pub fn list_candidate_files(dir: &Path, suffix: &str) -> Result<Vec<String>, ScanError> {
    let err = |e| ScanError(dir.to_path_buf(), e);
    let mut found = vec![];

    for entry in fs::read_dir(dir).map_err(err)? {
        let entry = entry.map_err(err)?;
        let name = match entry.file_name().into_string() {
            Ok(n) => n,
            Err(n) => {
                debug!("skipping non utf-8 name {:?}", n);
                continue;
            }
        };
        if !name.ends_with(suffix) {
            continue;
        }
        if entry.file_type().map_err(err)?.is_dir() {
            continue;
        }
        found.push(name);
    }

    debug!(count = found.len(), dir = %dir.display(), "candidates");
    Ok(found)
}
