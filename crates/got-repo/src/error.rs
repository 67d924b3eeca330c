//! Error types for repository operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating or initializing a repository.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The path could not be resolved or inspected.
    #[error("invalid path {}: {source}", path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `init` target already has entries.
    #[error("{} is not empty", .0.display())]
    NotEmpty(PathBuf),

    /// `init` target exists but is a file.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The storage subtree is missing, incomplete or has unusable metadata.
    #[error("not a got repository: {}: {reason}", path.display())]
    NotARepository { path: PathBuf, reason: String },

    /// `find` walked up to the filesystem root without a match.
    #[error("no got repository found in {} or any parent directory", .0.display())]
    NoRepositoryFound(PathBuf),

    /// The default branch name given to `init` is unusable.
    #[error("invalid branch name {name:?}: {reason}")]
    InvalidBranchName { name: String, reason: String },

    /// Metadata could not be rendered.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error while reading or writing inside the repository.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RepoError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Convenience type alias for repository operations.
pub type RepoResult<T> = std::result::Result<T, RepoError>;
