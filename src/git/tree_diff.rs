//! Changed-file enumeration between two snapshots.
//!
//! The tree-to-tree diff comes from git2; rename detection is our own
//! post-pass over the raw added/deleted pairs so the similarity threshold
//! and tie-break stay visible, configurable policy instead of opaque
//! libgit2 behavior.

use git2::Delta;
use log::{debug, warn};
use similar::TextDiff;

use super::object_store::ObjectStore;
use super::types::{ChangeKind, ChangedFile, Snapshot};
use crate::error::{Result, RevlineError};

/// Rename-detection policy. The threshold is the minimum `similar` line
/// ratio (0.0..=1.0) at which a deleted/added pair collapses into a rename.
#[derive(Debug, Clone, Copy)]
pub struct RenameOptions {
    pub detect: bool,
    pub threshold: f32,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            detect: true,
            threshold: 0.5,
        }
    }
}

/// Outcome of a tree diff: the changed files plus any non-fatal rename
/// ambiguity warnings gathered along the way.
#[derive(Debug)]
pub struct TreeDiff {
    pub files: Vec<ChangedFile>,
    pub warnings: Vec<RevlineError>,
}

/// Compare the file trees of two snapshots.
///
/// The result is ordered lexicographically by path and is deterministic:
/// diffing the same pair twice yields the same sequence. Comparing a
/// snapshot against itself (or any two snapshots sharing a root tree)
/// yields an empty sequence.
pub fn diff_trees(
    store: &ObjectStore,
    old: Snapshot,
    new: Snapshot,
    rename: &RenameOptions,
) -> Result<TreeDiff> {
    if old.tree_id == new.tree_id {
        return Ok(TreeDiff {
            files: Vec::new(),
            warnings: Vec::new(),
        });
    }

    let repo = store.repo();
    let old_tree = repo
        .find_tree(old.tree_id)
        .map_err(|source| RevlineError::SnapshotUnavailable {
            snapshot: old.short_id(),
            source,
        })?;
    let new_tree = repo
        .find_tree(new.tree_id)
        .map_err(|source| RevlineError::SnapshotUnavailable {
            snapshot: new.short_id(),
            source,
        })?;

    let diff = repo
        .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)
        .map_err(|source| RevlineError::SnapshotUnavailable {
            snapshot: new.short_id(),
            source,
        })?;

    let mut files: Vec<ChangedFile> = Vec::new();
    for delta in diff.deltas() {
        let kind = match delta.status() {
            Delta::Added => ChangeKind::Added,
            Delta::Deleted => ChangeKind::Deleted,
            _ => ChangeKind::Modified,
        };
        let file = match kind {
            ChangeKind::Deleted => delta.old_file(),
            _ => delta.new_file(),
        };
        let Some(path) = file.path() else {
            continue;
        };
        files.push(ChangedFile {
            path: path.to_string_lossy().into_owned(),
            old_path: None,
            kind,
        });
    }
    debug!(
        "Tree diff {}..{}: {} raw deltas",
        old.short_id(),
        new.short_id(),
        files.len()
    );

    let mut warnings = Vec::new();
    if rename.detect {
        files = collapse_renames(store, old, new, files, rename, &mut warnings)?;
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(TreeDiff { files, warnings })
}

/// Pair up deleted and added files whose content similarity meets the
/// threshold, replacing each matched pair with a single Renamed entry.
///
/// Added paths are considered in lexicographic order; a tie between equally
/// similar sources is broken by the lexicographically smallest old path and
/// recorded as a warning.
fn collapse_renames(
    store: &ObjectStore,
    old: Snapshot,
    new: Snapshot,
    files: Vec<ChangedFile>,
    rename: &RenameOptions,
    warnings: &mut Vec<RevlineError>,
) -> Result<Vec<ChangedFile>> {
    let mut added: Vec<String> = files
        .iter()
        .filter(|f| f.kind == ChangeKind::Added)
        .map(|f| f.path.clone())
        .collect();
    let mut deleted: Vec<String> = files
        .iter()
        .filter(|f| f.kind == ChangeKind::Deleted)
        .map(|f| f.path.clone())
        .collect();

    if added.is_empty() || deleted.is_empty() {
        return Ok(files);
    }
    added.sort();
    deleted.sort();

    let mut out: Vec<ChangedFile> = files
        .into_iter()
        .filter(|f| f.kind == ChangeKind::Modified)
        .collect();

    for new_path in added {
        let new_content = store.read_file(new, &new_path)?;

        let mut best_score = 0.0_f32;
        let mut candidates: Vec<String> = Vec::new();
        for old_path in &deleted {
            let old_content = store.read_file(old, old_path)?;
            let score = similarity(&old_content, &new_content);
            if score > best_score {
                best_score = score;
                candidates.clear();
                candidates.push(old_path.clone());
            } else if score == best_score && !candidates.is_empty() {
                candidates.push(old_path.clone());
            }
        }

        if best_score < rename.threshold || candidates.is_empty() {
            out.push(ChangedFile {
                path: new_path,
                old_path: None,
                kind: ChangeKind::Added,
            });
            continue;
        }

        // deleted is sorted, so the first candidate is the smallest path
        let chosen = candidates[0].clone();
        if candidates.len() > 1 {
            warn!(
                "Rename source for '{new_path}' is ambiguous at similarity {best_score:.2}: {candidates:?}"
            );
            warnings.push(RevlineError::RenameThresholdAmbiguous {
                path: new_path.clone(),
                chosen: chosen.clone(),
                candidates: candidates.clone(),
            });
        }
        debug!("Detected rename {chosen} -> {new_path} (similarity {best_score:.2})");
        deleted.retain(|p| p != &chosen);
        out.push(ChangedFile {
            path: new_path,
            old_path: Some(chosen),
            kind: ChangeKind::Renamed,
        });
    }

    for old_path in deleted {
        out.push(ChangedFile {
            path: old_path,
            old_path: None,
            kind: ChangeKind::Deleted,
        });
    }

    Ok(out)
}

/// Line-based similarity ratio between two blobs, in 0.0..=1.0.
fn similarity(old: &[u8], new: &[u8]) -> f32 {
    TextDiff::from_lines(old, new).ratio()
}
