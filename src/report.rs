use crate::config::Config;
use crc::{Crc, CRC_32_ISO_HDLC};
use md5::Md5;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, enabled, warn, Level};

const RULE: &str = "-------------------------------------";

/// Size and digests of a patched rom, for comparing against known dumps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputSummary {
    pub size: u64,
    pub crc32: u32,
    pub md5: String,
    pub sha1: String,
}

impl OutputSummary {
    pub fn of(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let crc = Crc::<u32>::new(&CRC_32_ISO_HDLC);
        let mut crc_digest = crc.digest();
        let mut md5 = Md5::new();
        let mut sha1 = Sha1::new();
        let mut size = 0;

        let mut buf = vec![0; 64 * 1024];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            crc_digest.update(&buf[..n]);
            md5.update(&buf[..n]);
            sha1.update(&buf[..n]);
            size += n as u64;
        }

        Ok(Self {
            size,
            crc32: crc_digest.finalize(),
            md5: hex::encode(md5.finalize()),
            sha1: hex::encode(sha1.finalize()),
        })
    }
}

/// Logs the size and digests of `path` at debug level. The file is only read
/// when debug logging is enabled.
pub fn log_output_summary(path: &Path) {
    if !enabled!(Level::DEBUG) {
        return;
    }
    match OutputSummary::of(path) {
        Ok(s) => debug!(
            path = %path.display(),
            size = s.size,
            crc32 = %format!("{:08x}", s.crc32),
            md5 = %s.md5,
            sha1 = %s.sha1,
            "patched output"
        ),
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to summarise output"),
    }
}

pub fn setup_started<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Patcher not found. Downloading and setting it up...")
}

pub fn setup_done<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Patcher successfully set up.")
}

pub fn nothing_to_patch<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Nothing to patch.")
}

pub fn selected<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "You selected: {}", name)
}

pub fn success<W: Write>(out: &mut W, config: &Config) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "ReviveMii Patcher Public Beta {}", crate::VERSION)?;
    writeln!(
        out,
        "Game was patched successfully! It's \"{}\" now",
        config.output_name
    )?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Credits:")?;
    writeln!(
        out,
        "{} is https://github.com/AdmiralCurtiss/WfcPatcher",
        config.helper_name
    )?;
    writeln!(
        out,
        "{} is licensed under the GNU General Public License v3.0 and because of this this Program is also licensed under the GNU General Public License v3.0.",
        config.helper_name
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "You can get this Program Source code on https://github.com/ReviveMii/Patcher"
    )?;
    writeln!(out)?;
    writeln!(out, "(c) 2024. ReviveMii Project. https://revivemii.fr.to/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.nds");
        std::fs::write(&path, b"123456789").unwrap();

        let s = OutputSummary::of(&path).unwrap();
        assert_eq!(s.size, 9);
        assert_eq!(s.crc32, 0xcbf43926);
        assert_eq!(s.md5, "25f9e794323b453885f5181f1b624d0b");
        assert_eq!(s.sha1, "f7c3bc1d808e04732adf679965ccc34ca7ae3441");
    }

    #[test]
    fn test_success_banner() {
        let mut out = vec![];
        success(&mut out, &Config::default()).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with(&format!(
            "{RULE}\nReviveMii Patcher Public Beta v0.0.1\nGame was patched successfully! It's \"output.nds\" now\n{RULE}\nCredits:\n"
        )));
        assert!(!out.contains("CRC32"));
        assert!(out.contains("helper.exe is https://github.com/AdmiralCurtiss/WfcPatcher\n"));
        assert!(out.ends_with("(c) 2024. ReviveMii Project. https://revivemii.fr.to/\n"));
    }
}
