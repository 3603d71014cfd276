//! Read-only access to the repository object database.
//!
//! Everything here reads immutable objects (commits, trees, blobs) through
//! git2; no working-tree state is ever consulted, so two runs over the same
//! snapshot pair always see the same bytes.

use std::collections::HashMap;
use std::path::Path;

use git2::{ObjectType, Repository};
use log::debug;

use super::types::Snapshot;
use crate::error::{Result, RevlineError};

pub struct ObjectStore {
    repo: Repository,
    resolved: HashMap<String, Snapshot>,
}

impl ObjectStore {
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening repository at {path:?}");
        let repo = Repository::open(path)?;
        Ok(Self {
            repo,
            resolved: HashMap::new(),
        })
    }

    pub(crate) fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Resolve a revision expression (full or abbreviated SHA, branch name,
    /// tag, or a relative expression like "HEAD~1") to a snapshot.
    ///
    /// Results are cached for the lifetime of this store, so repeated
    /// lookups of the same expression are free.
    pub fn resolve(&mut self, revision: &str) -> Result<Snapshot> {
        if let Some(snapshot) = self.resolved.get(revision) {
            return Ok(*snapshot);
        }

        let object = self.repo.revparse_single(revision).map_err(|source| {
            RevlineError::UnresolvedRevision {
                revision: revision.to_string(),
                source,
            }
        })?;
        let commit = object.peel_to_commit().map_err(|source| {
            RevlineError::UnresolvedRevision {
                revision: revision.to_string(),
                source,
            }
        })?;

        let snapshot = Snapshot {
            commit_id: commit.id(),
            tree_id: commit.tree_id(),
        };
        debug!("Resolved '{revision}' to commit {}", snapshot.commit_id);
        self.resolved.insert(revision.to_string(), snapshot);
        Ok(snapshot)
    }

    /// Raw blob content of `path` at `snapshot`.
    pub fn read_file(&self, snapshot: Snapshot, path: &str) -> Result<Vec<u8>> {
        let tree = self.repo.find_tree(snapshot.tree_id).map_err(|source| {
            RevlineError::SnapshotUnavailable {
                snapshot: snapshot.short_id(),
                source,
            }
        })?;

        let entry =
            tree.get_path(Path::new(path))
                .map_err(|_| RevlineError::PathNotFound {
                    path: path.to_string(),
                    snapshot: snapshot.short_id(),
                })?;

        if entry.kind() != Some(ObjectType::Blob) {
            return Err(RevlineError::NotAFile {
                path: path.to_string(),
                snapshot: snapshot.short_id(),
            });
        }

        let blob = self.repo.find_blob(entry.id()).map_err(|source| {
            RevlineError::SnapshotUnavailable {
                snapshot: snapshot.short_id(),
                source,
            }
        })?;
        Ok(blob.content().to_vec())
    }
}
