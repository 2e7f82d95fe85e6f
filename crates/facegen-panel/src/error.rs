use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("cosmetic path construction failed: {0}")]
    Path(#[from] facegen_export::path::PathError),

    #[error("could not write panel {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not re-read panel {path:?} for post-processing: {source}")]
    Reread {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Editor(#[from] facegen_export::editor::EditorError),

    #[error(transparent)]
    PostProcess(#[from] facegen_export::postprocess::PostProcessError),

    #[error(transparent)]
    Minify(#[from] facegen_export::minify::MinifyError),
}
