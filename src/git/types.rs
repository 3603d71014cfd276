use git2::Oid;
use serde::Serialize;

/// Immutable pointer to one point in history: a commit and its root tree.
///
/// Snapshots are resolved once per revision string and cached for the
/// duration of a run; they are never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub commit_id: Oid,
    pub tree_id: Oid,
}

impl Snapshot {
    /// Abbreviated commit id for log lines and error messages.
    pub fn short_id(&self) -> String {
        let id = self.commit_id.to_string();
        id[..id.len().min(8)].to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    Renamed,
}

impl ChangeKind {
    pub fn as_char(&self) -> char {
        match self {
            ChangeKind::Added => 'A',
            ChangeKind::Deleted => 'D',
            ChangeKind::Modified => 'M',
            ChangeKind::Renamed => 'R',
        }
    }
}

/// One file differing between two snapshots.
///
/// For deletions `path` is the old path (the file no longer exists in the
/// new snapshot); `old_path` is set only on renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedFile {
    pub path: String,
    pub old_path: Option<String>,
    pub kind: ChangeKind,
}
