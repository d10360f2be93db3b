//! Docstring handling: dedenting, summaries and `name -- description` annotations.
//!
//! Annotation lines are the convention for embedding structured parameter docs in
//! free text:
//!
//! ```text
//! Lists widgets.
//!
//! colour -- only return widgets of this colour
//! GET -- summary used for the GET operation
//! ```

/// Marker that replaces newlines in generated notes
pub const LINE_BREAK: &str = "<br/>";

const ANNOTATION_DELIMITER: &str = " -- ";
const TAB_SIZE: usize = 8;

/// Removes docstring indentation.
///
/// The first line is stripped on its own; the smallest indentation of the
/// remaining non-blank lines is removed from each of them. Tabs are expanded
/// first and surrounding blank lines are dropped. Blank input yields an empty
/// string.
pub fn trim_docstring(docstring: &str) -> String {
    if docstring.trim().is_empty() {
        return String::new();
    }

    let lines: Vec<String> = docstring.lines().map(expand_tabs).collect();

    let indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    let mut trimmed = Vec::with_capacity(lines.len());
    trimmed.push(lines[0].trim().to_string());
    for line in &lines[1..] {
        if line.trim().is_empty() {
            trimmed.push(String::new());
        } else {
            trimmed.push(line[indent..].trim_end().to_string());
        }
    }

    trimmed.join("\n").trim().to_string()
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_SIZE - column % TAB_SIZE;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Text of the first line up to its first period.
pub fn first_sentence(text: &str) -> String {
    let first_line = text.split('\n').next().unwrap_or_default();
    first_line.split('.').next().unwrap_or_default().to_string()
}

/// Text of the first line.
pub fn first_line(text: &str) -> String {
    text.split('\n').next().unwrap_or_default().to_string()
}

/// Lazily yields the `(name, description)` pairs of every annotation line.
///
/// A line is an annotation when it contains ` -- `; it is split on the first
/// occurrence and both halves are trimmed. Calling this again re-parses from
/// the start.
pub fn parse_from_docstring(docstring: &str) -> DocstringParams<'_> {
    DocstringParams {
        lines: docstring.lines(),
    }
}

/// Iterator returned by [`parse_from_docstring`].
#[derive(Debug, Clone)]
pub struct DocstringParams<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> Iterator for DocstringParams<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if let Some((name, description)) = line.split_once(ANNOTATION_DELIMITER) {
                return Some((name.trim(), description.trim()));
            }
        }
        None
    }
}

/// Cuts the docstring before its first line containing `--`.
///
/// Only the free text above the annotations survives. A docstring without
/// such a line is returned untouched, so applying this twice changes nothing.
pub fn strip_params_from_docstring(docstring: &str) -> String {
    let trimmed = trim_docstring(docstring);
    let lines: Vec<&str> = trimmed.lines().collect();

    match lines.iter().position(|line| line.trim().contains("--")) {
        Some(cut_off) => lines[..cut_off].join("\n").trim_end().to_string(),
        None => docstring.to_string(),
    }
}

/// Replaces newlines with [`LINE_BREAK`].
pub fn to_break_markers(text: &str) -> String {
    text.replace('\n', LINE_BREAK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_docstring_removes_common_indent() {
        let doc = "Summary line.\n\n        Details here.\n          Indented more.\n    ";
        assert_eq!(
            trim_docstring(doc),
            "Summary line.\n\nDetails here.\n  Indented more."
        );
    }

    #[test]
    fn test_trim_docstring_leading_newline() {
        let doc = "\n    Widget.\n\n    id -- the identifier\n    ";
        assert_eq!(trim_docstring(doc), "Widget.\n\nid -- the identifier");
    }

    #[test]
    fn test_trim_docstring_blank() {
        assert_eq!(trim_docstring(""), "");
        assert_eq!(trim_docstring("   \n  \n"), "");
    }

    #[test]
    fn test_trim_docstring_expands_tabs() {
        assert_eq!(trim_docstring("Title\n\tbody\n\t  more"), "Title\nbody\n  more");
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("Widget. Another sentence.\nSecond line"), "Widget");
        assert_eq!(first_sentence("No period here\nnext"), "No period here");
        assert_eq!(first_sentence(""), "");
    }

    #[test]
    fn test_parse_from_docstring_yields_pairs() {
        let doc = "Widgets.\n\nid -- the identifier\n  colour --  a colour  \nplain line";
        let params: Vec<_> = parse_from_docstring(doc).collect();
        assert_eq!(
            params,
            vec![("id", "the identifier"), ("colour", "a colour")]
        );
    }

    #[test]
    fn test_parse_from_docstring_splits_on_first_delimiter() {
        let params: Vec<_> = parse_from_docstring("range -- from -- to").collect();
        assert_eq!(params, vec![("range", "from -- to")]);
    }

    #[test]
    fn test_parse_from_docstring_ignores_tight_delimiter() {
        assert_eq!(parse_from_docstring("a--b\nc --d").count(), 0);
    }

    #[test]
    fn test_parse_from_docstring_is_restartable() {
        let doc = "x -- one\ny -- two";
        let first: Vec<_> = parse_from_docstring(doc).collect();
        let second: Vec<_> = parse_from_docstring(doc).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_strip_params_cuts_at_annotations() {
        let doc = "Widget.\n\nMore about widgets.\nid -- the identifier\ntail";
        assert_eq!(
            strip_params_from_docstring(doc),
            "Widget.\n\nMore about widgets."
        );
    }

    #[test]
    fn test_strip_params_without_annotations_is_unchanged() {
        let doc = "  Widget.\n\n    Indented body\n";
        assert_eq!(strip_params_from_docstring(doc), doc);
    }

    #[test]
    fn test_strip_params_is_idempotent() {
        let doc = "\n    Widget.\n\n    id -- the identifier\n";
        let once = strip_params_from_docstring(doc);
        let twice = strip_params_from_docstring(&once);
        assert_eq!(once, "Widget.");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_params_first_line_annotation() {
        assert_eq!(strip_params_from_docstring("id -- identifier"), "");
    }

    #[test]
    fn test_to_break_markers() {
        assert_eq!(to_break_markers("a\nb\n"), "a<br/>b<br/>");
    }
}
