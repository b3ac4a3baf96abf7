//! Incremental patch application for reformat-on-save.
//!
//! Given a document as an ordered sequence of text lines and a diff script
//! describing how an external formatter transformed that document, replay
//! the script against the live document, editing only the affected line
//! ranges. The surrounding editor keeps everything it attaches to document
//! identity (cursor, scroll position, undo history, folds) because the
//! document object is mutated in place rather than replaced wholesale.

mod diff;
mod parser;

pub use diff::diff_script;
pub use parser::Hunk;
pub use parser::MalformedScript;
pub use parser::parse_script;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error(transparent)]
    MalformedScript(#[from] MalformedScript),
    /// A hunk resolved to a position outside the current document. The hunk
    /// sequence was not produced from the document's present content (stale
    /// document, wrong diff, or a sequence applied twice); a caller-side
    /// precondition violation, never retried.
    #[error(
        "hunk {hunk:?} resolves to position {position} in a document of {line_count} line(s)"
    )]
    OffsetOutOfRange {
        hunk: Hunk,
        position: i64,
        line_count: usize,
    },
}

/// Mutable, ordered sequence of text lines that a patch is replayed against.
///
/// The applicator edits documents only through this trait, so a caller can
/// back one with a plain `Vec<String>`, a rope, or an editor buffer: any
/// representation that supports positional insert and range delete.
pub trait LineBuffer {
    fn line_count(&self) -> usize;

    /// Insert `lines` so that the first becomes line `index` (0-based);
    /// `index == line_count()` appends at the end.
    fn insert_lines(&mut self, index: usize, lines: &[String]);

    /// Remove `count` lines starting at line `index` (0-based). Callers
    /// guarantee `index + count <= line_count()`.
    fn delete_lines(&mut self, index: usize, count: usize);
}

impl LineBuffer for Vec<String> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn insert_lines(&mut self, index: usize, lines: &[String]) {
        for (offset, line) in lines.iter().enumerate() {
            self.insert(index + offset, line.clone());
        }
    }

    fn delete_lines(&mut self, index: usize, count: usize) {
        self.drain(index..index + count);
    }
}

/// Replay `hunks` against `document` in order.
///
/// Each hunk is anchored to a line number of the document as it was before
/// any hunk ran; a running offset translates that anchor into the document's
/// current numbering, so the whole sequence applies in one forward pass.
///
/// The sequence must come from a diff against the exact content `document`
/// holds when this is called. Nothing is rolled back on error: edits made
/// before a [`PatchError::OffsetOutOfRange`] stand, and callers that need
/// atomicity snapshot the document first.
pub fn apply_hunks<B>(document: &mut B, hunks: &[Hunk]) -> Result<(), PatchError>
where
    B: LineBuffer + ?Sized,
{
    // Net line-count delta contributed by the hunks applied so far. A
    // deletion shrinks the document, so later anchors sit `count` lines
    // below their current position; an insertion grows it, so they sit
    // above. Scripts reference strictly increasing original line numbers,
    // which is why one running total is enough.
    let mut offset: i64 = 0;
    for hunk in hunks {
        let line_count = document.line_count();
        let out_of_range = |position: i64| PatchError::OffsetOutOfRange {
            hunk: hunk.clone(),
            position,
            line_count,
        };
        match hunk {
            Hunk::Delete { at_line, count } => {
                let position = *at_line as i64 - offset;
                if position < 1 || position + *count as i64 - 1 > line_count as i64 {
                    return Err(out_of_range(position));
                }
                document.delete_lines(position as usize - 1, *count);
                offset += *count as i64;
            }
            Hunk::Insert { at_line, lines } => {
                // `position` names the line the new text goes after; 0
                // prepends at the very start of the document.
                let position = *at_line as i64 - offset;
                if position < 0 || position > line_count as i64 {
                    return Err(out_of_range(position));
                }
                document.insert_lines(position as usize, lines);
                offset -= lines.len() as i64;
            }
        }
    }
    Ok(())
}

/// Parse `script` and replay it against `document` in one step.
pub fn apply_script<B>(document: &mut B, script: &str) -> Result<(), PatchError>
where
    B: LineBuffer + ?Sized,
{
    let hunks = parse_script(script)?;
    apply_hunks(document, &hunks)
}

/// Split document text into lines the way a line-diff counts them.
///
/// The trailing empty element produced by a final newline is dropped so that
/// line numbers match the behaviour of standard `diff`.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split('\n').map(|s| s.to_string()).collect();
    if lines.last().is_some_and(|s| s.is_empty()) {
        lines.pop();
    }
    lines
}

/// Join patched lines back into document text, restoring the final newline.
pub fn join_lines(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}
