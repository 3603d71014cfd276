use thiserror::Error;

/// Failures the correlation core can produce.
///
/// Everything here is deterministic for a given repository state; retrying a
/// failed operation with the same inputs fails the same way.
#[derive(Debug, Error)]
pub enum RevlineError {
    #[error("cannot resolve revision '{revision}': {source}")]
    UnresolvedRevision {
        revision: String,
        #[source]
        source: git2::Error,
    },

    #[error("'{path}' does not exist at snapshot {snapshot}")]
    PathNotFound { path: String, snapshot: String },

    #[error("'{path}' is not a regular file at snapshot {snapshot}")]
    NotAFile { path: String, snapshot: String },

    #[error("snapshot {snapshot} cannot be read: {source}")]
    SnapshotUnavailable {
        snapshot: String,
        #[source]
        source: git2::Error,
    },

    #[error("content is neither valid UTF-8 nor binary")]
    ContentNotUtf8,

    /// More than one deleted file tied for best rename similarity. The
    /// lexicographically smallest candidate wins; the rest are kept here so
    /// the caller can surface the tie.
    #[error("rename source for '{path}' is ambiguous, picked '{chosen}' over {candidates:?}")]
    RenameThresholdAmbiguous {
        path: String,
        chosen: String,
        candidates: Vec<String>,
    },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

pub type Result<T> = std::result::Result<T, RevlineError>;
