use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

/// One classified line within a hunk.
///
/// `content` includes the trailing newline iff the source line has one; the
/// final line of a file with no trailing newline keeps its content intact
/// and sets `missing_trailing_newline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchLine {
    pub kind: LineKind,
    pub content: String,
    pub old_lineno: Option<u32>,
    pub new_lineno: Option<u32>,
    pub missing_trailing_newline: bool,
}

/// One contiguous region of difference plus surrounding context. Hunks in a
/// patch never overlap and are ordered by ascending `new_start`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub lines: Vec<PatchLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub hunks: Vec<Hunk>,
    /// Set when either buffer was sniffed as binary; the single marker hunk
    /// carries no line detail and must not be interpreted.
    pub is_binary: bool,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Render the patch back to unified-diff text, without file headers.
    pub fn to_unified_string(&self) -> String {
        let mut out = String::new();
        if self.is_binary {
            out.push_str("Binary files differ\n");
            return out;
        }
        for hunk in &self.hunks {
            out.push_str(&format!(
                "@@ -{},{} +{},{} @@\n",
                hunk.old_start, hunk.old_lines, hunk.new_start, hunk.new_lines
            ));
            for line in &hunk.lines {
                out.push(match line.kind {
                    LineKind::Context => ' ',
                    LineKind::Added => '+',
                    LineKind::Removed => '-',
                });
                out.push_str(&line.content);
                if line.missing_trailing_newline {
                    out.push('\n');
                    out.push_str("\\ No newline at end of file\n");
                }
            }
        }
        out
    }
}
