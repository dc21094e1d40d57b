use super::{locate_output, PatchError, Patcher};
use crate::config::Config;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Runs the downloaded helper under the compatibility runtime:
/// `<runtime> <helper> -d <domain> <input>`.
///
/// The helper writes its result next to the input or into its current
/// directory, which is the configured root. Paths under the root are passed
/// relative to it, as wine maps absolute host paths onto a DOS drive.
#[derive(Clone, Debug)]
pub struct ExternalPatcher {
    runtime: String,
    helper: PathBuf,
    domain: String,
    root: PathBuf,
    output_name: String,
}

impl ExternalPatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            runtime: config.runtime.clone(),
            helper: config.helper_path(),
            domain: config.domain.clone(),
            root: config.root.clone(),
            output_name: config.helper_output_name(),
        }
    }

    fn output_candidates(&self, input: &Path) -> Vec<PathBuf> {
        let mut candidates = vec![];
        if let Some(dir) = input.parent() {
            candidates.push(dir.join(&self.output_name));
        }
        candidates.push(self.root.join(&self.output_name));
        candidates
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

impl Patcher for ExternalPatcher {
    fn apply(&self, input: &Path) -> Result<PathBuf, PatchError> {
        let helper = self.relative(&self.helper);
        let arg = self.relative(input);
        info!(
            "Running {} {} -d {} {}",
            self.runtime,
            helper.display(),
            self.domain,
            arg.display()
        );

        let status = Command::new(&self.runtime)
            .arg(helper)
            .arg("-d")
            .arg(&self.domain)
            .arg(arg)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| PatchError::Launch(self.runtime.clone(), e))?;

        if !status.success() {
            return Err(PatchError::Exit(status));
        }
        debug!(%status, "helper finished");

        locate_output(&self.output_candidates(input)).ok_or(PatchError::OutputNotFound)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // The helper is a shell script and `sh` stands in for the runtime. It sees
    // `-d <domain> <input>` as `$1 $2 $3`.
    fn setup(script: &str) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let mut config = Config::with_root(dir.path());
        config.runtime = "sh".to_string();
        fs::create_dir_all(dir.path().join("patcher")).unwrap();
        fs::write(config.helper_path(), script).unwrap();
        fs::create_dir_all(config.work_dir()).unwrap();
        fs::write(config.working_copy(), b"rom").unwrap();
        (dir, config)
    }

    #[test]
    fn test_output_next_to_input() {
        let (_dir, config) = setup(
            r#"[ "$1" = "-d" ] || exit 3
out="$(dirname "$3")/game($2).nds"
{ cat "$3"; printf patched; } > "$out""#,
        );

        let out = ExternalPatcher::new(&config)
            .apply(&config.working_copy())
            .unwrap();
        assert_eq!(out, config.work_dir().join("game(d.errexe.xyz).nds"));
        assert_eq!(fs::read(out).unwrap(), b"rompatched");
    }

    #[test]
    fn test_paths_relative_to_root() {
        let (_dir, config) = setup(
            r#"[ "$0" = "patcher/helper.exe" ] || exit 4
[ "$3" = "tmp/game.nds" ] || exit 5
printf ok > "tmp/game($2).nds""#,
        );

        let out = ExternalPatcher::new(&config)
            .apply(&config.working_copy())
            .unwrap();
        assert_eq!(out, config.work_dir().join("game(d.errexe.xyz).nds"));
    }

    #[test]
    fn test_output_in_current_dir() {
        let (dir, config) = setup(r#"printf cwd > "game($2).nds""#);

        let out = ExternalPatcher::new(&config)
            .apply(&config.working_copy())
            .unwrap();
        assert_eq!(out, dir.path().join("game(d.errexe.xyz).nds"));
        assert_eq!(fs::read(out).unwrap(), b"cwd");
    }

    #[test]
    fn test_output_is_silenced() {
        let (_dir, config) = setup(
            r#"echo noisy; echo noisier >&2
printf ok > "$(dirname "$3")/game($2).nds""#,
        );

        assert!(ExternalPatcher::new(&config)
            .apply(&config.working_copy())
            .is_ok());
    }

    #[test]
    fn test_nonzero_exit() {
        let (_dir, config) = setup(r#"printf x > "game($2).nds"; exit 2"#);

        let err = ExternalPatcher::new(&config)
            .apply(&config.working_copy())
            .unwrap_err();
        assert!(matches!(err, PatchError::Exit(s) if s.code() == Some(2)));
    }

    #[test]
    fn test_success_without_output() {
        let (_dir, config) = setup("exit 0");

        let err = ExternalPatcher::new(&config)
            .apply(&config.working_copy())
            .unwrap_err();
        assert!(matches!(err, PatchError::OutputNotFound));
    }

    #[test]
    fn test_missing_runtime() {
        let (_dir, mut config) = setup("exit 0");
        config.runtime = "definitely-not-a-runtime-4f1c".to_string();

        let err = ExternalPatcher::new(&config)
            .apply(&config.working_copy())
            .unwrap_err();
        assert!(matches!(err, PatchError::Launch(..)));
    }
}
