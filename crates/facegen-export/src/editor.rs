//! Headless Inkscape invocation used to flatten saved panels.
//!
//! The composer cannot express every fabrication shape directly (text must
//! become paths, the output-jack capsule needs a real boolean difference),
//! so the saved file is run through the external editor once with a scripted
//! action list.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("could not launch inkscape (is it installed and in $PATH?): {0}")]
    Launch(#[from] std::io::Error),
    #[error("inkscape exited with {status}:\n{output}")]
    Failed { status: String, output: String },
}

/// Actions appended after any per-component boolean operations: convert all
/// text to paths and flatten the two fabrication layer groups so downstream
/// CAM tools see plain geometry.
const FLATTEN_ACTIONS: &str = "select-by-element:text;ObjectToPath;select-by-id:throughholes_offset;SelectionUnGroup;select-by-id:stencil_offset;SelectionUnGroup;FileSave;FileQuit";

/// Runs the editor over `file`, executing `component_actions` (the deferred
/// per-component operations, already `;`-terminated) before the standard
/// flatten sequence. Blocks until the editor exits; there is no timeout.
pub fn flatten_svg(file: &Path, component_actions: &str) -> Result<(), EditorError> {
    let actions = format!("{component_actions}{FLATTEN_ACTIONS}");
    run_inkscape(&[
        "--with-gui",
        &format!("--actions={actions}"),
        &file.to_string_lossy(),
    ])
}

fn run_inkscape(args: &[&str]) -> Result<(), EditorError> {
    debug!(?args, "running inkscape");
    let output = Command::new("inkscape").args(args).output()?;

    let text = filter_font_face_noise(&String::from_utf8_lossy(&output.stdout));
    if !output.status.success() {
        let mut combined = text;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            combined.push_str(stderr.trim_end());
        }
        return Err(EditorError::Failed {
            status: output.status.to_string(),
            output: combined,
        });
    }
    if !text.trim().is_empty() {
        debug!("inkscape output: {text}");
    }
    Ok(())
}

/// Drops the `end_font_face_cb` warning blocks Inkscape prints for every
/// embedded @font-face; everything else passes through untouched.
#[must_use]
pub fn filter_font_face_noise(output: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut lines = output.lines().peekable();
    while let Some(line) = lines.next() {
        if line.starts_with("end_font_face_cb") {
            for prefix in ["  font-family", "  font-style", "  font-weight", "  src"] {
                if lines.peek().is_some_and(|next| next.starts_with(prefix)) {
                    lines.next();
                }
            }
        } else {
            kept.push(line);
        }
    }
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_face_noise_is_dropped() {
        let noisy = "end_font_face_cb\n  font-family: Ubuntu\n  font-style: normal\n  font-weight: 500\n  src: url(...)\nreal warning";
        assert_eq!(filter_font_face_noise(noisy), "real warning");
    }

    #[test]
    fn unrelated_output_is_preserved() {
        let text = "line one\nline two";
        assert_eq!(filter_font_face_noise(text), text);
    }

    #[test]
    fn partial_noise_block_only_drops_matching_lines() {
        let noisy = "end_font_face_cb\n  font-family: Ubuntu\nother";
        assert_eq!(filter_font_face_noise(noisy), "other");
    }
}
