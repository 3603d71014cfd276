use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::Result;
use git2::{Oid, Repository};
use tempfile::TempDir;

pub(crate) fn create_test_repo() -> Result<(TempDir, Repository, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().to_path_buf();

    let repo = Repository::init(&repo_path)?;

    // Configure git user for commits
    let mut config = repo.config()?;
    config.set_str("user.name", "Test User")?;
    config.set_str("user.email", "test@example.com")?;

    Ok((temp_dir, repo, repo_path))
}

/// Write the given files, stage them, and commit. Returns the commit id.
pub(crate) fn commit_files(
    repo: &Repository,
    repo_path: &Path,
    files: &[(&str, &str)],
    message: &str,
) -> Result<Oid> {
    let mut index = repo.index()?;
    for (name, content) in files {
        let file_path = repo_path.join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, content)?;
        index.add_path(Path::new(name))?;
    }
    index.write()?;

    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;
    let signature = git2::Signature::now("Test User", "test@example.com")?;

    let parent_commit = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = if let Some(ref parent) = parent_commit {
        vec![parent]
    } else {
        vec![]
    };

    let commit_id = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )?;

    Ok(commit_id)
}

/// Remove a file from both the working tree and the index, then commit.
pub(crate) fn commit_removal(
    repo: &Repository,
    repo_path: &Path,
    name: &str,
    message: &str,
) -> Result<Oid> {
    let mut index = repo.index()?;
    fs::remove_file(repo_path.join(name))?;
    index.remove_path(Path::new(name))?;
    index.write()?;

    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;
    let signature = git2::Signature::now("Test User", "test@example.com")?;

    let parent_commit = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = if let Some(ref parent) = parent_commit {
        vec![parent]
    } else {
        vec![]
    };

    let commit_id = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )?;

    Ok(commit_id)
}
