//! Line-number correlation across one patch.
//!
//! Lines inside a hunk map through the hunk's recorded line numbers; lines
//! outside every hunk are unchanged content, but still shift position by
//! the net line delta of every hunk before them. Both directions track
//! that drift.

use std::collections::BTreeSet;

use crate::patch::{LineKind, Patch};

/// New-file line numbers that are Added, i.e. eligible to receive an inline
/// annotation. Context and Removed lines never appear.
pub fn new_lines_touched(patch: &Patch) -> BTreeSet<u32> {
    let mut touched = BTreeSet::new();
    if patch.is_binary {
        return touched;
    }
    for hunk in &patch.hunks {
        for line in &hunk.lines {
            if line.kind == LineKind::Added
                && let Some(n) = line.new_lineno
            {
                touched.insert(n);
            }
        }
    }
    touched
}

/// Map a line number in the old file to its position in the new file.
///
/// Returns `None` for removed lines; removed content has no position on the
/// new side. A line outside every hunk is unchanged and maps through the
/// cumulative delta of the hunks preceding it.
pub fn map_old_to_new(patch: &Patch, old_line: u32) -> Option<u32> {
    if patch.is_binary || old_line == 0 {
        return None;
    }

    let mut delta: i64 = 0;
    for hunk in &patch.hunks {
        if hunk.old_lines == 0 {
            // Pure insertion: old_start is the line *before* the insertion
            // point, and is itself unaffected.
            if old_line <= hunk.old_start {
                break;
            }
            delta += i64::from(hunk.new_lines);
            continue;
        }

        if old_line < hunk.old_start {
            break;
        }
        if old_line < hunk.old_start + hunk.old_lines {
            for line in &hunk.lines {
                match line.kind {
                    LineKind::Context if line.old_lineno == Some(old_line) => {
                        return line.new_lineno;
                    }
                    LineKind::Removed if line.old_lineno == Some(old_line) => {
                        return None;
                    }
                    _ => {}
                }
            }
            return None;
        }
        delta += i64::from(hunk.new_lines) - i64::from(hunk.old_lines);
    }

    u32::try_from(i64::from(old_line) + delta).ok()
}

/// Map a line number in the new file to its position in the old file.
///
/// Symmetric inverse of [`map_old_to_new`]: added lines return `None`.
pub fn map_new_to_old(patch: &Patch, new_line: u32) -> Option<u32> {
    if patch.is_binary || new_line == 0 {
        return None;
    }

    let mut delta: i64 = 0;
    for hunk in &patch.hunks {
        if hunk.new_lines == 0 {
            // Pure deletion: new_start is the line before the removed
            // region on the new side.
            if new_line <= hunk.new_start {
                break;
            }
            delta += i64::from(hunk.old_lines);
            continue;
        }

        if new_line < hunk.new_start {
            break;
        }
        if new_line < hunk.new_start + hunk.new_lines {
            for line in &hunk.lines {
                match line.kind {
                    LineKind::Context if line.new_lineno == Some(new_line) => {
                        return line.old_lineno;
                    }
                    LineKind::Added if line.new_lineno == Some(new_line) => {
                        return None;
                    }
                    _ => {}
                }
            }
            return None;
        }
        delta += i64::from(hunk.old_lines) - i64::from(hunk.new_lines);
    }

    u32::try_from(i64::from(new_line) + delta).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::build_from_contents;
    use crate::patch::{Hunk, Patch, PatchLine};

    // old:           new:
    // 1 a            1 a
    // 2 b            2 X    (b replaced)
    // 3 c            3 c
    // 4 d            4 new  (inserted)
    // 5 e            5 d
    //                6 e
    fn sample_patch() -> Patch {
        build_from_contents(b"a\nb\nc\nd\ne\n", b"a\nX\nc\nnew\nd\ne\n", 0).unwrap()
    }

    #[test]
    fn test_touched_lines_are_added_only() {
        let patch = sample_patch();
        let touched: Vec<u32> = new_lines_touched(&patch).into_iter().collect();
        assert_eq!(touched, vec![2, 4]);
    }

    #[test]
    fn test_touched_lines_empty_for_identical_content() {
        let patch = build_from_contents(b"a\nb\n", b"a\nb\n", 3).unwrap();
        assert!(new_lines_touched(&patch).is_empty());
    }

    #[test]
    fn test_map_old_to_new_outside_hunks() {
        let patch = sample_patch();
        // Line 1 precedes every hunk.
        assert_eq!(map_old_to_new(&patch, 1), Some(1));
        // Lines after the insertion shift down by one.
        assert_eq!(map_old_to_new(&patch, 4), Some(5));
        assert_eq!(map_old_to_new(&patch, 5), Some(6));
        // Beyond EOF is still "unchanged plus drift".
        assert_eq!(map_old_to_new(&patch, 40), Some(41));
    }

    #[test]
    fn test_map_old_to_new_removed_line() {
        let patch = sample_patch();
        assert_eq!(map_old_to_new(&patch, 2), None);
    }

    #[test]
    fn test_map_new_to_old_added_lines() {
        let patch = sample_patch();
        assert_eq!(map_new_to_old(&patch, 2), None);
        assert_eq!(map_new_to_old(&patch, 4), None);
    }

    #[test]
    fn test_map_new_to_old_outside_hunks() {
        let patch = sample_patch();
        assert_eq!(map_new_to_old(&patch, 1), Some(1));
        assert_eq!(map_new_to_old(&patch, 5), Some(4));
        assert_eq!(map_new_to_old(&patch, 6), Some(5));
    }

    #[test]
    fn test_context_lines_map_within_hunks() {
        // With context the hunk swallows the unchanged neighbours; they must
        // still map across through their recorded numbers.
        let patch = build_from_contents(b"a\nb\nc\nd\ne\n", b"a\nX\nc\nnew\nd\ne\n", 2).unwrap();
        assert_eq!(map_old_to_new(&patch, 1), Some(1));
        assert_eq!(map_old_to_new(&patch, 3), Some(3));
        assert_eq!(map_old_to_new(&patch, 5), Some(6));
        assert_eq!(map_new_to_old(&patch, 3), Some(3));
        assert_eq!(map_new_to_old(&patch, 6), Some(5));
    }

    #[test]
    fn test_round_trip_for_unchanged_lines() {
        let patch = sample_patch();
        for old_line in [1, 3, 4, 5, 17] {
            if let Some(new_line) = map_old_to_new(&patch, old_line) {
                assert_eq!(map_new_to_old(&patch, new_line), Some(old_line));
            } else {
                panic!("line {old_line} is unchanged and must map across");
            }
        }
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let patch = Patch::default();
        assert_eq!(map_old_to_new(&patch, 7), Some(7));
        assert_eq!(map_new_to_old(&patch, 7), Some(7));
        assert!(new_lines_touched(&patch).is_empty());
    }

    #[test]
    fn test_binary_patch_maps_nothing() {
        let patch = Patch {
            hunks: vec![Hunk::default()],
            is_binary: true,
        };
        assert_eq!(map_old_to_new(&patch, 1), None);
        assert_eq!(map_new_to_old(&patch, 1), None);
        assert!(new_lines_touched(&patch).is_empty());
    }

    #[test]
    fn test_pure_deletion_drift() {
        // old: a b c d e / new: a e  (b, c, d deleted)
        let patch = build_from_contents(b"a\nb\nc\nd\ne\n", b"a\ne\n", 0).unwrap();
        assert_eq!(map_old_to_new(&patch, 1), Some(1));
        assert_eq!(map_old_to_new(&patch, 2), None);
        assert_eq!(map_old_to_new(&patch, 4), None);
        assert_eq!(map_old_to_new(&patch, 5), Some(2));
        assert_eq!(map_new_to_old(&patch, 2), Some(5));
    }

    #[test]
    fn test_lineno_fields_consistent_with_mapping() {
        // Sanity on hand-built hunks: mapping honors recorded line numbers
        // rather than recomputing them.
        let patch = Patch {
            hunks: vec![Hunk {
                old_start: 10,
                old_lines: 2,
                new_start: 10,
                new_lines: 2,
                lines: vec![
                    PatchLine {
                        kind: LineKind::Context,
                        content: "keep\n".into(),
                        old_lineno: Some(10),
                        new_lineno: Some(10),
                        missing_trailing_newline: false,
                    },
                    PatchLine {
                        kind: LineKind::Removed,
                        content: "gone\n".into(),
                        old_lineno: Some(11),
                        new_lineno: None,
                        missing_trailing_newline: false,
                    },
                    PatchLine {
                        kind: LineKind::Added,
                        content: "fresh\n".into(),
                        old_lineno: None,
                        new_lineno: Some(11),
                        missing_trailing_newline: false,
                    },
                ],
            }],
            is_binary: false,
        };
        assert_eq!(map_old_to_new(&patch, 10), Some(10));
        assert_eq!(map_old_to_new(&patch, 11), None);
        assert_eq!(map_new_to_old(&patch, 11), None);
        assert_eq!(map_old_to_new(&patch, 12), Some(12));
    }
}
