use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the user by deployment operations.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to overwrite unparsable settings file {}: {source}", path.display())]
    CorruptSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("refusing to overwrite settings file {}: top level is not a JSON object", path.display())]
    SettingsNotObject { path: PathBuf },

    #[error("source not found: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("target path does not exist: {}", path.display())]
    TargetMissing { path: PathBuf },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

impl DeployError {
    /// Attach `path` to an I/O error.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| DeployError::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
