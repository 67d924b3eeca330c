use got_repo::RepoError;
use got_store::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("repository error: {0}")]
    Repo(#[from] RepoError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SdkError {
    /// Coarse classification for callers that only need to branch on the
    /// kind of failure, such as the CLI's JSON error report.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Repo(e) => match e {
                RepoError::InvalidPath { .. } => ErrorCategory::Path,
                RepoError::NotEmpty(_)
                | RepoError::NotADirectory(_)
                | RepoError::NotARepository { .. }
                | RepoError::InvalidBranchName { .. }
                | RepoError::Serialization(_) => ErrorCategory::RepositoryState,
                RepoError::NoRepositoryFound(_) => ErrorCategory::NotFound,
                RepoError::Io { .. } => ErrorCategory::Io,
            },
            Self::Store(e) => match e {
                StoreError::NotFound(_) => ErrorCategory::NotFound,
                StoreError::KindMismatch { .. } => ErrorCategory::KindMismatch,
                StoreError::HashMismatch { .. }
                | StoreError::Corrupt { .. }
                | StoreError::Format(_) => ErrorCategory::Format,
                StoreError::Unresolvable { .. } => ErrorCategory::Unresolved,
                StoreError::Io { .. } => ErrorCategory::Io,
            },
        }
    }
}

/// Failure classes shared by every got operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A path could not be resolved or inspected.
    Path,
    /// The repository is missing pieces, has bad metadata, or the `init`
    /// target is unusable.
    RepositoryState,
    /// No repository in any ancestor, or no object under the requested hash.
    NotFound,
    /// Bytes that are not a valid object record.
    Format,
    /// The stored kind differs from the requested one.
    KindMismatch,
    /// Filesystem failure while reading or writing.
    Io,
    /// A name that is not a full object hash.
    Unresolved,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::RepositoryState => "repository_state",
            Self::NotFound => "not_found",
            Self::Format => "format",
            Self::KindMismatch => "kind_mismatch",
            Self::Io => "io",
            Self::Unresolved => "unresolved",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
