//! Optional SVG minification via the external `scour` tool.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("could not run scour: {0}")]
    Launch(std::io::Error),
    #[error("scour exited with {status}:\n{output}")]
    Failed { status: String, output: String },
    #[error("could not replace {path:?} with minified output: {source}")]
    Replace {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Minifies `file` in place. A missing `scour` executable is a soft failure:
/// the unminified file is kept and a warning is logged. Any other failure is
/// reported to the caller.
pub fn minify_in_place(file: &Path) -> Result<(), MinifyError> {
    let dir = file.parent().unwrap_or_else(|| Path::new("."));
    let tmp = tempfile::Builder::new()
        .suffix(".svg")
        .tempfile_in(dir)
        .map_err(MinifyError::Launch)?;

    let result = Command::new("scour")
        .arg("-i")
        .arg(file)
        .arg("-o")
        .arg(tmp.path())
        .args(["--set-precision=5", "--indent=space", "--nindent=2", "--quiet"])
        .output();

    let output = match result {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("scour is not installed; skipping minification");
            return Ok(());
        }
        Err(e) => return Err(MinifyError::Launch(e)),
        Ok(output) => output,
    };

    if !output.status.success() {
        return Err(MinifyError::Failed {
            status: output.status.to_string(),
            output: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    tmp.persist(file).map_err(|e| MinifyError::Replace {
        path: file.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
