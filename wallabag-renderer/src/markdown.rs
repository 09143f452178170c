//! HTML → Markdown conversion for article bodies.

/// Convert an article's HTML body to Markdown.
///
/// Output uses LF line endings and carries no trailing whitespace lines.
pub fn html_to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let converted = html2md::parse_html(html).replace("\r\n", "\n");
    converted.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_html_gives_empty_markdown() {
        assert_eq!(html_to_markdown("   "), "");
    }

    #[test]
    fn emphasis_and_links_convert() {
        let md = html_to_markdown(r#"<p>Read <a href="https://x.example">this</a> <em>now</em></p>"#);
        assert!(md.contains("[this](https://x.example)"), "got: {md}");
        assert!(md.contains("*now*"), "got: {md}");
        assert!(!md.contains("<p>"));
    }

    #[test]
    fn no_crlf_in_output() {
        let md = html_to_markdown("<p>a</p>\r\n<p>b</p>");
        assert!(!md.contains('\r'));
    }
}
