use std::sync::LazyLock;

use regex::Regex;

static HORIZONTAL_WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

// Ligature glyphs that PDF text extraction leaves behind.
const LIGATURES: &[(&str, &str)] = &[
    ("ﬁ", "fi"),
    ("ﬂ", "fl"),
    ("ﬃ", "ffi"),
    ("ﬄ", "ffl"),
    ("ﬅ", "ft"),
    ("ﬆ", "st"),
];

/// Replace ligature glyphs, then normalize whitespace.
pub fn clean_text(text: &str) -> String {
    let mut text = text.to_string();
    for (ligature, ascii) in LIGATURES {
        if text.contains(ligature) {
            text = text.replace(ligature, ascii);
        }
    }
    normalize_whitespace(&text)
}

/// Collapse runs of horizontal whitespace to a single space and runs of
/// blank lines to a single blank line, trimming the edges. Single
/// newlines survive untouched.
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut last_blank = false;
    for line in text.trim().lines() {
        let line = HORIZONTAL_WS_RE.replace_all(line.trim(), " ").into_owned();
        if line.is_empty() {
            if !last_blank {
                lines.push(String::new());
                last_blank = true;
            }
        } else {
            lines.push(line);
            last_blank = false;
        }
    }
    lines.join("\n")
}

/// Cleanup for one extracted page. Non-empty pages keep a trailing
/// newline so concatenating pages cannot glue the last line of one to
/// the first heading of the next.
pub fn prepare_page(raw: &str) -> String {
    let mut cleaned = clean_text(raw);
    if !cleaned.is_empty() {
        cleaned.push('\n');
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_edges() {
        assert_eq!(
            clean_text("  leading and trailing spaces  "),
            "leading and trailing spaces"
        );
    }

    #[test]
    fn replaces_ligatures() {
        assert_eq!(clean_text("ﬁrst oﬃce"), "first office");
    }

    #[test]
    fn collapses_multiple_spaces() {
        assert_eq!(clean_text("word  another   word"), "word another word");
        assert_eq!(clean_text("tabs\t\there"), "tabs here");
    }

    #[test]
    fn keeps_single_newlines() {
        assert_eq!(normalize_whitespace("Hello\nworld"), "Hello\nworld");
    }

    #[test]
    fn collapses_blank_line_runs() {
        assert_eq!(normalize_whitespace("Hello\n\n\n\nworld"), "Hello\n\nworld");
    }

    #[test]
    fn combined() {
        assert_eq!(
            clean_text("  \tﬁnal\n\n\n\n  oﬃce test   "),
            "final\n\noffice test"
        );
    }

    #[test]
    fn whitespace_only_becomes_empty() {
        assert_eq!(clean_text("   \n\n\t  "), "");
        assert_eq!(prepare_page("   \n\t"), "");
    }

    #[test]
    fn prepared_pages_concatenate_cleanly() {
        let joined = format!("{}{}", prepare_page("01 First\nbody  "), prepare_page("02 Second\nmore"));
        assert_eq!(joined, "01 First\nbody\n02 Second\nmore\n");
    }
}
