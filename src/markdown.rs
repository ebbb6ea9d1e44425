//! Markdown-to-HTML conversion for post bodies.

use pulldown_cmark::{html, Options, Parser};

/// Converts a post's raw text to HTML with the common markdown extensions
/// enabled. Callers running in preformatted mode skip this entirely.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut body = String::new();
    html::push_html(&mut body, Parser::new_ext(markdown, options));
    body
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_heading() {
        assert_eq!(to_html("# Hello"), "<h1>Hello</h1>\n");
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(to_html("plain text"), "<p>plain text</p>\n");
    }
}
