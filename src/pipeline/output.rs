//! Output stage: write encoded bytes to stdout or a file.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from an optional `-o` argument; `-` means stdout.
    #[must_use]
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(p) if p != Path::new("-") => Self::File(p.to_path_buf()),
            _ => Self::Stdout,
        }
    }
}

impl std::fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &[u8], target: &OutputTarget) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| {
                    if content.last() == Some(&b'\n') {
                        Ok(())
                    } else {
                        stdout.write_all(b"\n")
                    }
                })
                .and_then(|()| stdout.flush())
                .context("Failed to write output to stdout")?;
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .map_err(|e| crate::SitError::io(path, e))
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            tracing::debug!("Output written to {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_target_from_arg() {
        assert_eq!(OutputTarget::from_arg(None), OutputTarget::Stdout);
        assert_eq!(OutputTarget::from_arg(Some(Path::new("-"))), OutputTarget::Stdout);
        assert_eq!(
            OutputTarget::from_arg(Some(Path::new("out.json"))),
            OutputTarget::File(PathBuf::from("out.json"))
        );
    }

    #[test]
    fn test_write_to_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.json");
        write_output(b"{}", &OutputTarget::File(path.clone())).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn test_write_to_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let target = OutputTarget::File(tmp.path().join("missing").join("out.json"));
        let err = write_output(b"{}", &target).unwrap_err();
        assert!(err.to_string().contains("Failed to write output"));
    }
}
