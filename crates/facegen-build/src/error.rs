use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no such tool: {program} (is it installed and in $PATH?)")]
    MissingTool { program: String },

    #[error("could not launch {program}: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    #[error("command failed:\n\n    {command}\n\n{output}")]
    ToolFailed { command: String, output: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid build manifest {path:?}: {source}")]
    Manifest {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid panel description {path:?}: {source}")]
    PanelConfig {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("faceplate render failed: {0}")]
    Faceplate(#[from] facegen_panel::PanelError),
}
