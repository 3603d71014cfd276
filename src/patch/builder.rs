//! Pure buffer-to-patch diffing.
//!
//! `build_from_contents` is a pure function over two byte buffers: no
//! repository, no global state, safe to call from any number of threads at
//! once. The line-level diff itself (LCS, hunk coalescing within
//! `2 * context_lines`, no-newline-at-EOF bookkeeping) is delegated to
//! libgit2 through `git2::Patch::from_buffers`; this module converts the
//! result into owned structures.

use git2::{DiffOptions, Patch as GitPatch};

use super::types::{Hunk, LineKind, Patch, PatchLine};
use crate::error::{Result, RevlineError};

/// How far into a buffer the binary sniff looks, matching git's own
/// heuristic.
const BINARY_SNIFF_BYTES: usize = 8000;

/// A buffer is treated as binary when a NUL byte appears within the sniff
/// window.
pub fn is_binary(content: &[u8]) -> bool {
    content.iter().take(BINARY_SNIFF_BYTES).any(|&b| b == 0)
}

/// Diff two file contents into a structured patch.
///
/// Identical buffers produce a patch with zero hunks. Binary content
/// short-circuits to a marker patch; check `is_binary` before reading line
/// data. Non-binary content must be valid UTF-8.
pub fn build_from_contents(old: &[u8], new: &[u8], context_lines: u32) -> Result<Patch> {
    if is_binary(old) || is_binary(new) {
        return Ok(Patch {
            hunks: vec![Hunk::default()],
            is_binary: true,
        });
    }
    if std::str::from_utf8(old).is_err() || std::str::from_utf8(new).is_err() {
        return Err(RevlineError::ContentNotUtf8);
    }

    let mut opts = DiffOptions::new();
    opts.context_lines(context_lines);
    let git_patch = GitPatch::from_buffers(old, None, new, None, Some(&mut opts))?;

    let mut hunks = Vec::with_capacity(git_patch.num_hunks());
    for hunk_idx in 0..git_patch.num_hunks() {
        let (git_hunk, line_count) = git_patch.hunk(hunk_idx)?;
        let mut hunk = Hunk {
            old_start: git_hunk.old_start(),
            old_lines: git_hunk.old_lines(),
            new_start: git_hunk.new_start(),
            new_lines: git_hunk.new_lines(),
            lines: Vec::with_capacity(line_count),
        };

        for line_idx in 0..line_count {
            let line = git_patch.line_in_hunk(hunk_idx, line_idx)?;
            let kind = match line.origin() {
                ' ' => LineKind::Context,
                '+' => LineKind::Added,
                '-' => LineKind::Removed,
                // '=', '<' and '>' are libgit2's end-of-file newline
                // markers; the flag below carries that information instead.
                _ => continue,
            };
            let content = std::str::from_utf8(line.content())
                .map_err(|_| RevlineError::ContentNotUtf8)?
                .to_string();
            let missing_trailing_newline = !content.ends_with('\n');
            hunk.lines.push(PatchLine {
                kind,
                content,
                old_lineno: line.old_lineno(),
                new_lineno: line.new_lineno(),
                missing_trailing_newline,
            });
        }
        hunks.push(hunk);
    }

    Ok(Patch {
        hunks,
        is_binary: false,
    })
}
