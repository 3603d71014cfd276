//! The correlation run: resolve two revisions, enumerate changed files,
//! fan the per-file diffs out over a bounded worker pool, and assemble the
//! report the annotation layer consumes.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use futures::StreamExt;
use futures::stream;
use log::{debug, info};
use serde::Serialize;

use super::line_map;
use crate::error::Result;
use crate::git::{
    ChangeKind, ChangedFile, ObjectStore, RenameOptions, Snapshot, diff_trees,
};
use crate::patch::{Patch, build_from_contents};

#[derive(Debug, Clone, Copy)]
pub struct CorrelateOptions {
    pub context_lines: u32,
    pub rename: RenameOptions,
    /// Worker pool width; defaults to available parallelism.
    pub workers: Option<usize>,
}

impl Default for CorrelateOptions {
    fn default() -> Self {
        Self {
            context_lines: 3,
            rename: RenameOptions::default(),
            workers: None,
        }
    }
}

/// One successfully diffed file, with its patch and line correlations.
#[derive(Debug, Serialize)]
pub struct FileCorrelation {
    pub path: String,
    pub old_path: Option<String>,
    pub kind: ChangeKind,
    pub patch: Patch,
}

impl FileCorrelation {
    /// New-file line numbers eligible for inline annotation.
    pub fn new_lines_touched(&self) -> BTreeSet<u32> {
        line_map::new_lines_touched(&self.patch)
    }

    pub fn map_old_to_new(&self, old_line: u32) -> Option<u32> {
        line_map::map_old_to_new(&self.patch, old_line)
    }

    pub fn map_new_to_old(&self, new_line: u32) -> Option<u32> {
        line_map::map_new_to_old(&self.patch, new_line)
    }
}

/// A file whose diff failed. The failure never aborts the other files.
#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Default)]
pub struct CorrelationReport {
    /// Resolved commit id of the base revision.
    pub base: String,
    /// Resolved commit id of the target revision.
    pub target: String,
    pub entries: Vec<FileCorrelation>,
    pub failures: Vec<FileFailure>,
    pub warnings: Vec<String>,
}

/// Correlate two revisions of the repository at `repo_path`.
///
/// Revision resolution and the tree diff are single-shot and abort the run
/// on failure; per-file diffs run concurrently and collect their failures
/// into the report instead. Entries come back ordered lexicographically by
/// path no matter which worker finished first.
pub async fn correlate(
    repo_path: &Path,
    base: &str,
    target: &str,
    options: CorrelateOptions,
) -> Result<CorrelationReport> {
    let mut store = ObjectStore::open(repo_path)?;
    let old = store.resolve(base)?;
    let new = store.resolve(target)?;

    let tree_diff = diff_trees(&store, old, new, &options.rename)?;
    info!(
        "{} changed files between {} and {}",
        tree_diff.files.len(),
        old.short_id(),
        new.short_id()
    );
    drop(store);

    let width = options.workers.unwrap_or_else(default_worker_count).max(1);
    let context_lines = options.context_lines;
    let repo_path: Arc<PathBuf> = Arc::new(repo_path.to_path_buf());

    let results: Vec<std::result::Result<FileCorrelation, FileFailure>> =
        stream::iter(tree_diff.files.into_iter().map(|file| {
            let repo_path = Arc::clone(&repo_path);
            async move {
                let path = file.path.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    diff_one_file(&repo_path, old, new, file, context_lines)
                });
                match handle.await {
                    Ok(outcome) => outcome,
                    Err(join_err) => Err(FileFailure {
                        path,
                        reason: format!("diff worker failed: {join_err}"),
                    }),
                }
            }
        }))
        .buffer_unordered(width)
        .collect()
        .await;

    let mut entries = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(entry) => entries.push(entry),
            Err(failure) => failures.push(failure),
        }
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    failures.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(CorrelationReport {
        base: old.commit_id.to_string(),
        target: new.commit_id.to_string(),
        entries,
        failures,
        warnings: tree_diff.warnings.iter().map(|w| w.to_string()).collect(),
    })
}

/// Diff one changed file. Runs on a blocking worker; opens its own
/// repository handle because git2 handles cannot be shared across threads.
fn diff_one_file(
    repo_path: &Path,
    old: Snapshot,
    new: Snapshot,
    file: ChangedFile,
    context_lines: u32,
) -> std::result::Result<FileCorrelation, FileFailure> {
    let path = file.path.clone();
    build_file_correlation(repo_path, old, new, file, context_lines).map_err(|err| FileFailure {
        reason: err.to_string(),
        path,
    })
}

fn build_file_correlation(
    repo_path: &Path,
    old: Snapshot,
    new: Snapshot,
    file: ChangedFile,
    context_lines: u32,
) -> Result<FileCorrelation> {
    let store = ObjectStore::open(repo_path)?;

    let old_content = match file.kind {
        ChangeKind::Added => Vec::new(),
        ChangeKind::Renamed => {
            let source = file.old_path.as_deref().unwrap_or(&file.path);
            store.read_file(old, source)?
        }
        _ => store.read_file(old, &file.path)?,
    };
    let new_content = match file.kind {
        ChangeKind::Deleted => Vec::new(),
        _ => store.read_file(new, &file.path)?,
    };

    let patch = build_from_contents(&old_content, &new_content, context_lines)?;
    debug!(
        "Diffed {} ({}): {} hunks",
        file.path,
        file.kind.as_char(),
        patch.hunks.len()
    );

    Ok(FileCorrelation {
        path: file.path,
        old_path: file.old_path,
        kind: file.kind,
        patch,
    })
}

fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}
