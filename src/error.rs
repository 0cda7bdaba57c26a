use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the setup operations that cannot be expressed as a plain
/// "did it work" flag.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to spawn `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("`{command}` exited with code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("download of {url} failed: {message}")]
    Download { url: String, message: String },

    #[error("could not determine the home directory")]
    NoHomeDirectory,
}

impl SetupError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SetupError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SetupError>;
