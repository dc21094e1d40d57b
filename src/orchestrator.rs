use crate::config::Config;
use crate::patch::{PatchError, Patcher};
use crate::preflight::{self, VersionError};
use crate::report;
use crate::scan::{self, ScanError};
use crate::select::{self, SelectError};
use crate::setup::{self, fetch::Transport, HelperStatus, SetupError};
use std::fmt;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("{0} is not installed. Please install {0} to run this program.\nYou can download and install {0} from: {1}")]
    RuntimeMissing(String, String),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error("could not set up patcher: {0}")]
    Setup(#[from] SetupError),
    #[error("could not list files: {0}")]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error("could not write to the terminal: {0}")]
    Output(#[from] io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    RuntimeCheck,
    VersionCheck,
    HelperSetup,
    Discovery,
    Selection,
    Patch,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::RuntimeCheck => "runtime check",
            Stage::VersionCheck => "version check",
            Stage::HelperSetup => "helper setup",
            Stage::Discovery => "discovery",
            Stage::Selection => "selection",
            Stage::Patch => "patch",
            Stage::Report => "report",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    NothingToPatch,
    Patched(PathBuf),
}

/// Drives one run from the runtime check to the final report. Every stage
/// runs once, in order, and any failure ends the run.
pub struct Orchestrator<'a, T: ?Sized, P: ?Sized> {
    config: &'a Config,
    transport: &'a T,
    patcher: &'a P,
}

impl<'a, T, P> Orchestrator<'a, T, P>
where
    T: Transport + ?Sized,
    P: Patcher + ?Sized,
{
    pub fn new(config: &'a Config, transport: &'a T, patcher: &'a P) -> Self {
        Self {
            config,
            transport,
            patcher,
        }
    }

    pub fn run<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> Result<Outcome, RunError> {
        let config = self.config;

        enter(Stage::RuntimeCheck);
        if !preflight::is_runtime_installed(&config.runtime) {
            return Err(RunError::RuntimeMissing(
                config.runtime.clone(),
                config.runtime_install_url.clone(),
            ));
        }

        enter(Stage::VersionCheck);
        preflight::check_version(self.transport, &config.version_url, crate::VERSION)?;

        enter(Stage::HelperSetup);
        if !setup::helper_present(config) {
            report::setup_started(out)?;
        }
        if setup::ensure_helper_exists(config, self.transport)? == HelperStatus::Installed {
            report::setup_done(out)?;
        }

        enter(Stage::Discovery);
        let candidates = scan::list_candidate_files(&config.root, &config.suffix)?;
        if candidates.is_empty() {
            report::nothing_to_patch(out)?;
            return Ok(Outcome::NothingToPatch);
        }

        enter(Stage::Selection);
        let choice = select::select_candidate(&candidates, input, out)?;
        let name = &candidates[choice];
        report::selected(out, name)?;

        enter(Stage::Patch);
        let output = self.patch(name)?;

        enter(Stage::Report);
        report::log_output_summary(&output);
        report::success(out, config)?;

        Ok(Outcome::Patched(output))
    }

    fn patch(&self, name: &str) -> Result<PathBuf, PatchError> {
        let config = self.config;

        let work_dir = config.work_dir();
        fs::create_dir_all(&work_dir).map_err(|e| PatchError::CreateWorkDir(work_dir.clone(), e))?;

        let source = config.root.join(name);
        let working_copy = config.working_copy();
        fs::copy(&source, &working_copy).map_err(|e| PatchError::Copy(source.clone(), e))?;

        let produced = self.patcher.apply(&working_copy)?;

        let output = config.output_path();
        fs::rename(&produced, &output).map_err(|e| PatchError::Move(produced.clone(), e))?;
        info!("Moved {} to {}", produced.display(), output.display());

        Ok(output)
    }
}

/// Process exit status for a finished run. Declining to patch is a success
/// and every error is a failure.
pub fn exit_status(result: &Result<Outcome, RunError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

fn enter(stage: Stage) {
    info!(%stage, "entering stage");
}
