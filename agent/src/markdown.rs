//! Markdown rendering for outgoing mail.

use pulldown_cmark::{Parser, html};

/// Renders the model's markdown report as an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_lists() {
        let rendered = to_html("# Weekly digest\n\n- first\n- second\n");
        assert!(rendered.contains("<h1>Weekly digest</h1>"));
        assert!(rendered.contains("<li>first</li>"));
        assert!(rendered.contains("<li>second</li>"));
    }

    #[test]
    fn renders_links_and_emphasis() {
        let rendered = to_html("see [the episode](https://example.com) for **details**");
        assert!(rendered.contains(r#"<a href="https://example.com">the episode</a>"#));
        assert!(rendered.contains("<strong>details</strong>"));
    }

    #[test]
    fn plain_text_becomes_a_paragraph() {
        assert_eq!(to_html("hello"), "<p>hello</p>\n");
    }
}
