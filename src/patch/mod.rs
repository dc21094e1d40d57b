mod external;

pub use external::ExternalPatcher;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("could not create tmp directory `{0}`: {1}")]
    CreateWorkDir(PathBuf, #[source] io::Error),
    #[error("could not copy `{0}`: {1}")]
    Copy(PathBuf, #[source] io::Error),
    #[error("could not run patcher under `{0}`: {1}")]
    Launch(String, #[source] io::Error),
    #[error("patcher exited unsuccessfully ({0})")]
    Exit(ExitStatus),
    #[error("patching failed: patched file not found")]
    OutputNotFound,
    #[error("could not move patched file `{0}`: {1}")]
    Move(PathBuf, #[source] io::Error),
}

/// Turns the rom at `input` into a patched rom and returns where it was
/// written.
pub trait Patcher {
    fn apply(&self, input: &Path) -> Result<PathBuf, PatchError>;
}

/// First of `candidates` that exists as a file.
pub fn locate_output(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_locate_output_priority() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("tmp").join("out.nds");
        let second = dir.path().join("out.nds");
        fs::create_dir(dir.path().join("tmp")).unwrap();

        assert_eq!(locate_output(&[first.clone(), second.clone()]), None);

        fs::write(&second, b"2").unwrap();
        assert_eq!(
            locate_output(&[first.clone(), second.clone()]),
            Some(second.clone())
        );

        fs::write(&first, b"1").unwrap();
        assert_eq!(locate_output(&[first.clone(), second]), Some(first));
    }
}
