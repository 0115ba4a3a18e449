use std::borrow::Cow;

use scraper::Html;
use unicode_width::UnicodeWidthChar;

/// Ellipsis appended to truncated snippets
const ELLIPSIS: &str = "...";
/// Display width of the ellipsis (3 columns for ASCII "...")
const ELLIPSIS_WIDTH: usize = 3;

/// Maximum display width of an entry snippet.
pub const SNIPPET_WIDTH: usize = 120;

/// Truncates a string to fit within a maximum display width.
///
/// If truncation is necessary, appends "..." to indicate text was cut off.
/// Width is measured in Unicode display columns, so CJK characters and emoji
/// count as two.
///
/// Returns `Cow::Borrowed` when the string already fits.
///
/// # Examples
///
/// ```
/// use feedreader::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    // Too narrow for "char + ellipsis": keep whatever fits, no ellipsis
    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut current_width = 0;
        for (idx, c) in s.char_indices() {
            let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width > max_width {
                break;
            }
            current_width += char_width;
            byte_end = idx + c.len_utf8();
        }
        if byte_end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..byte_end].to_string());
    }

    let target_width = max_width - ELLIPSIS_WIDTH;
    let mut current_width = 0;
    let mut cut_point = None;

    for (idx, c) in s.char_indices() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);

        if cut_point.is_none() && current_width + char_width > target_width {
            cut_point = Some(idx);
        }

        if current_width + char_width > max_width {
            let cut = cut_point.unwrap_or(idx);
            return Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS));
        }

        current_width += char_width;
    }

    Cow::Borrowed(s)
}

/// Extracts the text of feed-provided HTML.
///
/// The input is parsed as an HTML fragment, so every named and numeric
/// character reference is decoded. Text nodes are joined with a space, which
/// keeps words in adjacent block elements apart.
pub fn strip_markup(s: &str) -> Cow<'_, str> {
    if !s.contains('<') && !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let fragment = Html::parse_fragment(s);
    Cow::Owned(fragment.root_element().text().collect::<Vec<_>>().join(" "))
}

/// Builds the plain-text snippet shown under an entry title.
///
/// Strips markup, replaces control characters (including escape sequences'
/// lead byte) with spaces, collapses whitespace runs and truncates the result
/// to [`SNIPPET_WIDTH`] columns.
pub fn make_snippet(raw: &str) -> String {
    let plain = strip_markup(raw);
    let collapsed = plain
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    truncate_to_width(&collapsed, SNIPPET_WIDTH).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_fits_returns_borrowed() {
        assert!(matches!(truncate_to_width("Short", 10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_ascii_truncation() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
    }

    #[test]
    fn test_cjk_truncation() {
        // Each CJK char is 2 columns: 2 chars + "..." = 7
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
    }

    #[test]
    fn test_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
    }

    #[test]
    fn test_strip_markup_plain_text_borrowed() {
        assert!(matches!(strip_markup("no tags here"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_markup_removes_tags() {
        let stripped = strip_markup("<p>Hello <b>world</b></p>");
        assert_eq!(stripped.split_whitespace().collect::<Vec<_>>(), ["Hello", "world"]);
    }

    #[test]
    fn test_strip_markup_decodes_entities() {
        assert_eq!(strip_markup("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(strip_markup("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_strip_markup_decodes_numeric_and_named_entities() {
        assert_eq!(strip_markup("It&#8217;s a &mdash; test"), "It\u{2019}s a \u{2014} test");
        assert_eq!(strip_markup("caf&eacute; &#x263A;"), "caf\u{e9} \u{263a}");
    }

    #[test]
    fn test_strip_markup_keeps_block_words_apart() {
        let stripped = strip_markup("<p>first</p><p>second</p>");
        assert_eq!(stripped.split_whitespace().collect::<Vec<_>>(), ["first", "second"]);
    }

    #[test]
    fn test_snippet_decodes_entities() {
        assert_eq!(
            make_snippet("<p>It&#8217;s a &mdash; test</p>"),
            "It\u{2019}s a \u{2014} test"
        );
    }

    #[test]
    fn test_snippet_collapses_whitespace_and_controls() {
        assert_eq!(make_snippet("<p>one\n\n two</p>\x1b\tthree"), "one two three");
    }

    #[test]
    fn test_snippet_is_truncated() {
        let long = "word ".repeat(100);
        let snippet = make_snippet(&long);
        assert!(snippet.ends_with("..."));
        assert!(snippet.chars().count() <= SNIPPET_WIDTH);
    }

    #[test]
    fn test_snippet_empty_input() {
        assert_eq!(make_snippet(""), "");
        assert_eq!(make_snippet("<br/>"), "");
    }
}
