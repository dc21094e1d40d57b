use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use zip::{result::ZipError, ZipArchive};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("could not open `{0}`: {1}")]
    Open(PathBuf, #[source] io::Error),
    #[error("invalid zip archive: {0}")]
    Invalid(#[from] ZipError),
    #[error("file `{0}` not found in zip archive")]
    EntryNotFound(String),
    #[error("could not write `{0}`: {1}")]
    Write(PathBuf, #[source] io::Error),
}

/// Decompresses the first entry named exactly `entry_name` into `output_path`.
///
/// The entry is written to a sibling `.part` file and renamed into place only
/// once it has been fully decompressed, so `output_path` never holds a
/// truncated or corrupt copy. Nothing is created when the archive has no such
/// entry.
pub fn extract_file_from_zip(
    archive_path: &Path,
    entry_name: &str,
    output_path: &Path,
) -> Result<u64, ArchiveError> {
    let file =
        File::open(archive_path).map_err(|e| ArchiveError::Open(archive_path.to_path_buf(), e))?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.name() != entry_name {
            continue;
        }

        let partial = partial_path(output_path);
        let n = match write_entry(&mut entry, &partial) {
            Ok(n) => n,
            Err(e) => {
                if let Err(re) = fs::remove_file(&partial) {
                    debug!(path = %partial.display(), error = %re, "could not remove partial file");
                }
                return Err(ArchiveError::Write(output_path.to_path_buf(), e));
            }
        };
        fs::rename(&partial, output_path)
            .map_err(|e| ArchiveError::Write(output_path.to_path_buf(), e))?;

        debug!(entry = entry_name, bytes = n, "extracted");
        return Ok(n);
    }

    Err(ArchiveError::EntryNotFound(entry_name.to_string()))
}

fn partial_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    output_path.with_file_name(name)
}

fn write_entry<R: Read>(entry: &mut R, path: &Path) -> io::Result<u64> {
    let mut out = File::create(path)?;
    let n = io::copy(entry, &mut out)?;
    out.sync_all()?;
    Ok(n)
}
