//! Splitting of a formatter's combined output stream.
//!
//! Some formatter CLIs write the reformatted document and their report to
//! the same stream, separated by a line consisting solely of `=` characters.
//! Everything above the first such line is document content; everything
//! below it is the report. The patch engine never sees the delimiter.

/// Split `stream` at the first all-`=` delimiter line. Returns the document
/// content and, when a delimiter was found, the report that followed it.
pub(crate) fn split_combined(stream: &str) -> (&str, Option<&str>) {
    let mut offset = 0;
    for line in stream.split_inclusive('\n') {
        let text = line.strip_suffix('\n').unwrap_or(line);
        if is_delimiter(text) {
            let report_start = offset + line.len();
            return (&stream[..offset], Some(&stream[report_start..]));
        }
        offset += line.len();
    }
    (stream, None)
}

fn is_delimiter(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b == b'=')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::split_combined;

    #[test]
    fn stream_without_delimiter_is_all_content() {
        assert_eq!(split_combined("a\nb\n"), ("a\nb\n", None));
    }

    #[test]
    fn delimiter_separates_content_from_report() {
        assert_eq!(
            split_combined("a\nb\n========\nwarning: x\n"),
            ("a\nb\n", Some("warning: x\n"))
        );
    }

    #[test]
    fn delimiter_on_the_first_line_means_no_content() {
        assert_eq!(split_combined("====\noops\n"), ("", Some("oops\n")));
    }

    #[test]
    fn trailing_delimiter_yields_an_empty_report() {
        assert_eq!(split_combined("a\n====\n"), ("a\n", Some("")));
        assert_eq!(split_combined("a\n===="), ("a\n", Some("")));
    }

    #[test]
    fn lines_merely_containing_equals_are_content() {
        assert_eq!(split_combined("a == b\n= x\n"), ("a == b\n= x\n", None));
    }
}
