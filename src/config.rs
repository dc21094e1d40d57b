use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Name of the optional override file looked up in the root directory.
pub const CONFIG_FILE: &str = "patcher.json";

/// Fixed locations and endpoints used by a patching run.
///
/// Every file the tool touches is resolved against `root`, so a run can be
/// redirected into an isolated directory. `root` should be absolute because
/// the helper subprocess is started with it as its current directory.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub root: PathBuf,
    pub version_url: String,
    pub release_url: String,
    pub release_entry: String,
    pub runtime: String,
    pub runtime_install_url: String,
    pub helper_dir: PathBuf,
    pub helper_name: String,
    pub archive_name: String,
    pub work_dir: PathBuf,
    pub working_copy_name: String,
    pub domain: String,
    pub suffix: String,
    pub output_name: String,
    /// Upper bound on a whole request, body included. Unset means no limit,
    /// so a slow release download is never cut off.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            version_url: "https://theerrorexe.github.io/api-patcher-ver.txt".to_string(),
            release_url:
                "https://github.com/AdmiralCurtiss/WfcPatcher/releases/download/v1.6/WfcPatcher1.6.zip"
                    .to_string(),
            release_entry: "WfcPatcher.exe".to_string(),
            runtime: "wine".to_string(),
            runtime_install_url: "https://wiki.winehq.org/Download".to_string(),
            helper_dir: PathBuf::from("patcher"),
            helper_name: "helper.exe".to_string(),
            archive_name: "WfcPatcher1.6.zip".to_string(),
            work_dir: PathBuf::from("tmp"),
            working_copy_name: "game.nds".to_string(),
            domain: "d.errexe.xyz".to_string(),
            suffix: ".nds".to_string(),
            output_name: "output.nds".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Reads `patcher.json` from `root` on top of the defaults.
    ///
    /// A missing file is the normal case. An unreadable or malformed file is
    /// logged and ignored.
    pub fn load(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);
        let mut config = match fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str::<Config>(&s) {
                Ok(c) => {
                    debug!(path = %path.display(), "loaded config overrides");
                    c
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Config::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
                Config::default()
            }
        };
        config.root = root.to_path_buf();
        config
    }

    pub fn helper_path(&self) -> PathBuf {
        self.root.join(&self.helper_dir).join(&self.helper_name)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(&self.archive_name)
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.join(&self.work_dir)
    }

    pub fn working_copy(&self) -> PathBuf {
        self.work_dir().join(&self.working_copy_name)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_name)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// File name the helper gives its result: the working copy's stem tagged
    /// with the domain, e.g. `game(d.errexe.xyz).nds`.
    pub fn helper_output_name(&self) -> String {
        let copy = Path::new(&self.working_copy_name);
        let stem = copy
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        match copy.extension() {
            Some(ext) => format!("{}({}).{}", stem, self.domain, ext.to_string_lossy()),
            None => format!("{}({})", stem, self.domain),
        }
    }
}
