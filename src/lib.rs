// Library interface for revline (revision line correlation)
// This exposes modules for integration testing

pub mod config;
pub mod correlate;
pub mod error;
pub mod git;
pub mod logging;
pub mod patch;

// Re-export commonly used types for easier testing
pub use correlate::{
    CorrelateOptions, CorrelationReport, FileCorrelation, FileFailure, correlate,
    map_new_to_old, map_old_to_new, new_lines_touched,
};
pub use error::{Result, RevlineError};
pub use git::{ChangeKind, ChangedFile, ObjectStore, RenameOptions, Snapshot, diff_trees};
pub use patch::{Hunk, LineKind, Patch, PatchLine, build_from_contents};
