//! Line-diff collaborator: derives the append/delete script consumed by
//! [`crate::parse_script`] from an original/formatted document pair.
//!
//! The applicator itself never calls this (an external line-diff tool can
//! stand in for it), but shipping one makes the reformat pipeline
//! self-contained and lets the round-trip property be tested hermetically.

use similar::Algorithm;
use similar::DiffOp;
use similar::capture_diff_slices;

/// Produce a diff script that rewrites `original` into `formatted`.
///
/// Hunks are emitted in ascending original line number, the shape the
/// parser and applicator expect. A changed region becomes a delete followed
/// by an insert anchored after the deleted range; an insertion before the
/// first line is anchored at 0.
pub fn diff_script(original: &[String], formatted: &[String]) -> String {
    let mut script = String::new();
    for op in capture_diff_slices(Algorithm::Myers, original, formatted) {
        match op {
            DiffOp::Equal { .. } => {}
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                push_delete(&mut script, old_index, old_len);
            }
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => {
                push_insert(
                    &mut script,
                    old_index,
                    &formatted[new_index..new_index + new_len],
                );
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                push_delete(&mut script, old_index, old_len);
                push_insert(
                    &mut script,
                    old_index + old_len,
                    &formatted[new_index..new_index + new_len],
                );
            }
        }
    }
    script
}

fn push_delete(script: &mut String, old_index: usize, old_len: usize) {
    script.push_str(&format!("d{} {}\n", old_index + 1, old_len));
}

fn push_insert(script: &mut String, after_line: usize, lines: &[String]) {
    script.push_str(&format!("a{} {}\n", after_line, lines.len()));
    for line in lines {
        script.push_str(line);
        script.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::diff_script;

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn identical_documents_produce_an_empty_script() {
        let lines = doc(&["a", "b"]);
        assert_eq!(diff_script(&lines, &lines), "");
    }

    #[test]
    fn pure_insertion_is_anchored_after_the_preceding_line() {
        assert_eq!(
            diff_script(&doc(&["a", "c"]), &doc(&["a", "b", "c"])),
            "a1 1\nb\n"
        );
    }

    #[test]
    fn insertion_before_the_first_line_is_anchored_at_zero() {
        assert_eq!(
            diff_script(&doc(&["b"]), &doc(&["a", "b"])),
            "a0 1\na\n"
        );
    }

    #[test]
    fn pure_deletion_names_the_first_deleted_line() {
        assert_eq!(
            diff_script(&doc(&["a", "b", "c"]), &doc(&["a"])),
            "d2 2\n"
        );
    }

    #[test]
    fn changed_region_becomes_delete_then_insert() {
        assert_eq!(
            diff_script(&doc(&["a", "b", "c"]), &doc(&["a", "B", "c"])),
            "d2 1\na2 1\nB\n"
        );
    }
}
