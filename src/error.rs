use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the consonance pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The input could not be opened, probed or decoded, or held no samples.
    #[error("unreadable audio file {}: {reason}", .path.display())]
    UnreadableAudio { path: PathBuf, reason: String },

    /// A tunable is outside its valid range.
    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),

    /// The `<stem>_frames` sibling directory could not be created.
    #[error("failed to create frames directory {}", .path.display())]
    FramesDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A frame renderer could not write its output.
    #[error("visualizer failed: {0}")]
    Visualizer(String),
}

impl AnalysisError {
    pub(crate) fn unreadable(path: &std::path::Path, reason: impl ToString) -> Self {
        AnalysisError::UnreadableAudio {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
