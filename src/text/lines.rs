use std::borrow::Cow;

use super::LineSpan;

/// Fold every line ending into a single `\n`.
///
/// Divergent line endings would make every line of a region look changed,
/// so nothing is diffed or stored before passing through here.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Split a text into lines. The empty string has no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// Number of lines [`split_lines`] would return, without allocating.
pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.bytes().filter(|&b| b == b'\n').count() + 1
    }
}

/// Inverse of [`split_lines`].
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

/// Replace the lines in `span` with `replacement`.
///
/// Returns the new text and the span the replacement now covers, or `None`
/// if `span` does not fit inside `text`.
pub fn replace_span(text: &str, span: LineSpan, replacement: &str) -> Option<(String, LineSpan)> {
    let lines = split_lines(text);
    if span.start > span.end || span.end > lines.len() {
        return None;
    }

    let inserted = split_lines(replacement);
    let covered = LineSpan::new(span.start, span.start + inserted.len());

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() - span.len() + inserted.len());
    out.extend_from_slice(&lines[..span.start]);
    out.extend(inserted);
    out.extend_from_slice(&lines[span.end..]);

    Some((join_lines(&out), covered))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_borrows_clean_text() {
        let text = "a\nb\n";
        assert!(matches!(normalize_line_endings(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_normalize_crlf_and_lone_cr() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(split_lines("").is_empty());
        assert_eq!(line_count(""), 0);
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_line() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
        assert_eq!(line_count("a\nb\n"), 3);
    }

    #[test]
    fn test_join_is_inverse_of_split() {
        for text in ["", "a", "a\nb", "a\n\nb\n", "\n"] {
            assert_eq!(join_lines(&split_lines(text)), text);
            assert_eq!(split_lines(text).len(), line_count(text));
        }
    }

    #[test]
    fn test_replace_span_middle() {
        let (text, covered) = replace_span("a\nb\nc\nd", LineSpan::new(1, 3), "B\nC\nX").unwrap();
        assert_eq!(text, "a\nB\nC\nX\nd");
        assert_eq!(covered, LineSpan::new(1, 4));
    }

    #[test]
    fn test_replace_span_with_empty_deletes_lines() {
        let (text, covered) = replace_span("a\nb\nc", LineSpan::new(1, 2), "").unwrap();
        assert_eq!(text, "a\nc");
        assert_eq!(covered, LineSpan::new(1, 1));
    }

    #[test]
    fn test_replace_empty_span_inserts_lines() {
        let (text, covered) = replace_span("a\nd", LineSpan::new(1, 1), "b\nc").unwrap();
        assert_eq!(text, "a\nb\nc\nd");
        assert_eq!(covered, LineSpan::new(1, 3));
    }

    #[test]
    fn test_replace_whole_empty_document() {
        let (text, covered) = replace_span("", LineSpan::new(0, 0), "x\ny").unwrap();
        assert_eq!(text, "x\ny");
        assert_eq!(covered, LineSpan::new(0, 2));
    }

    #[test]
    fn test_replace_span_out_of_bounds() {
        assert!(replace_span("a", LineSpan::new(0, 2), "x").is_none());
    }
}
