//! This module is responsible for parsing & validating a diff script into a
//! list of "hunks". (It does not attempt to check that the hunks fit the
//! document they will be applied to.)
//!
//! The script format is the append/delete subset of an ed-style normal diff,
//! as emitted by standard line-diff tools:
//!
//! script      ::= hunk*
//! hunk        ::= delete-hunk | insert-hunk
//! delete-hunk ::= "d" INTEGER " " INTEGER LF
//! insert-hunk ::= "a" INTEGER " " INTEGER LF (RAW-LINE LF){count}
//!
//! The first integer is a 1-based line number in the document the script was
//! diffed from; the second is the number of lines deleted or inserted. Body
//! lines of an insert hunk are taken verbatim, so inserted text may itself
//! look like a hunk header. A delete anchor names the first deleted line; an
//! insert anchor names the line the new text goes after, and is allowed to
//! be 0 because that is how diff expresses an insertion before line 1.

use thiserror::Error;

/// A diff script line that does not conform to the script grammar. Carries
/// the offending line verbatim for diagnosis.
#[derive(Debug, PartialEq, Eq, Error)]
#[error("malformed diff script at line {line_number}: {message}: {line:?}")]
pub struct MalformedScript {
    pub message: String,
    pub line_number: usize,
    pub line: String,
}

/// One parsed change operation, anchored to a line number in the document
/// the script was diffed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hunk {
    /// Insert `lines` immediately after line `at_line` (0 inserts before the
    /// first line).
    Insert { at_line: usize, lines: Vec<String> },
    /// Delete `count` lines starting at line `at_line`.
    Delete { at_line: usize, count: usize },
}

impl Hunk {
    /// Number of document lines this hunk inserts or deletes.
    pub fn count(&self) -> usize {
        match self {
            Hunk::Insert { lines, .. } => lines.len(),
            Hunk::Delete { count, .. } => *count,
        }
    }
}

/// Parse a diff script into hunks, in script order.
///
/// An empty script is valid and yields no hunks. Scripts produced by a
/// line-diff over two documents list hunks by ascending original line
/// number; this function preserves whatever order the script has.
pub fn parse_script(script: &str) -> Result<Vec<Hunk>, MalformedScript> {
    let lines: Vec<&str> = script.lines().collect();
    let mut hunks: Vec<Hunk> = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let (hunk, hunk_lines) = parse_one_hunk(lines[index], &lines[index + 1..], index + 1)?;
        hunks.push(hunk);
        index += hunk_lines;
    }
    Ok(hunks)
}

/// Attempts to parse a single hunk from `header` and the lines that follow.
/// Returns the parsed hunk and the number of script lines consumed.
fn parse_one_hunk(
    header: &str,
    body: &[&str],
    line_number: usize,
) -> Result<(Hunk, usize), MalformedScript> {
    let malformed = |message: &str| MalformedScript {
        message: message.to_string(),
        line_number,
        line: header.to_string(),
    };

    let (rest, is_insert) = if let Some(rest) = header.strip_prefix('a') {
        (rest, true)
    } else if let Some(rest) = header.strip_prefix('d') {
        (rest, false)
    } else {
        return Err(malformed("expected an 'a' or 'd' hunk header"));
    };

    let Some((at_line, count)) = rest.split_once(' ') else {
        return Err(malformed("expected '<line> <count>' after the action"));
    };
    let at_line: usize = at_line
        .parse()
        .map_err(|_| malformed("hunk line number is not a non-negative integer"))?;
    let count: usize = count
        .parse()
        .map_err(|_| malformed("hunk line count is not a non-negative integer"))?;
    if count == 0 {
        return Err(malformed("hunk line count must be at least 1"));
    }

    if !is_insert {
        return Ok((Hunk::Delete { at_line, count }, 1));
    }

    if body.len() < count {
        return Err(malformed("insert hunk body is truncated"));
    }
    let lines = body[..count].iter().map(|s| s.to_string()).collect();
    Ok((Hunk::Insert { at_line, lines }, count + 1))
}

#[test]
fn test_parse_empty_script() {
    assert_eq!(parse_script(""), Ok(Vec::new()));
}

#[test]
fn test_parse_delete_hunk() {
    assert_eq!(
        parse_script("d3 2\n"),
        Ok(vec![Hunk::Delete {
            at_line: 3,
            count: 2
        }])
    );
}

#[test]
fn test_parse_insert_hunk_takes_body_verbatim() {
    // The second body line would itself parse as a delete header; it must be
    // consumed as raw inserted text.
    assert_eq!(
        parse_script("a2 2\nfn main() {\nd1 1\n"),
        Ok(vec![Hunk::Insert {
            at_line: 2,
            lines: vec!["fn main() {".to_string(), "d1 1".to_string()],
        }])
    );
}

#[test]
fn test_parse_prepend_anchor() {
    assert_eq!(
        parse_script("a0 1\nfirst\n"),
        Ok(vec![Hunk::Insert {
            at_line: 0,
            lines: vec!["first".to_string()],
        }])
    );
}

#[test]
fn test_parse_hunks_in_script_order() {
    assert_eq!(
        parse_script("d1 1\na3 1\nX\nd7 2\n"),
        Ok(vec![
            Hunk::Delete {
                at_line: 1,
                count: 1
            },
            Hunk::Insert {
                at_line: 3,
                lines: vec!["X".to_string()],
            },
            Hunk::Delete {
                at_line: 7,
                count: 2
            },
        ])
    );
}

#[test]
fn test_parse_rejects_unknown_action() {
    assert_eq!(
        parse_script("x1 1\n"),
        Err(MalformedScript {
            message: "expected an 'a' or 'd' hunk header".to_string(),
            line_number: 1,
            line: "x1 1".to_string(),
        })
    );
}

#[test]
fn test_parse_rejects_missing_count() {
    assert_eq!(
        parse_script("d4\n"),
        Err(MalformedScript {
            message: "expected '<line> <count>' after the action".to_string(),
            line_number: 1,
            line: "d4".to_string(),
        })
    );
}

#[test]
fn test_parse_rejects_zero_count() {
    assert_eq!(
        parse_script("a2 0\n"),
        Err(MalformedScript {
            message: "hunk line count must be at least 1".to_string(),
            line_number: 1,
            line: "a2 0".to_string(),
        })
    );
}

#[test]
fn test_parse_rejects_negative_line_number() {
    assert_eq!(
        parse_script("d-1 1\n"),
        Err(MalformedScript {
            message: "hunk line number is not a non-negative integer".to_string(),
            line_number: 1,
            line: "d-1 1".to_string(),
        })
    );
}

#[test]
fn test_parse_rejects_truncated_insert_body() {
    assert_eq!(
        parse_script("d1 1\na2 3\nonly\ntwo\n"),
        Err(MalformedScript {
            message: "insert hunk body is truncated".to_string(),
            line_number: 2,
            line: "a2 3".to_string(),
        })
    );
}

#[test]
fn test_parse_reports_script_line_numbers_after_bodies() {
    // The bad header sits on script line 4, after a two-line insert body.
    assert_eq!(
        parse_script("a1 2\nx\ny\nnot a header\n"),
        Err(MalformedScript {
            message: "expected an 'a' or 'd' hunk header".to_string(),
            line_number: 4,
            line: "not a header".to_string(),
        })
    );
}
