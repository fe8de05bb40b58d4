/// Turns the HTML stored in record bodies into terminal-friendly text.
pub trait ContentRenderer: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdRenderer;

impl ContentRenderer for Html2MdRenderer {
    fn to_markdown(&self, html: &str) -> String {
        html2md::parse_html(html).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraphs_and_emphasis() {
        let text = Html2MdRenderer.to_markdown("<p>Round <strong>two</strong> was hard.</p>");
        assert!(text.contains("**two**"), "{text}");
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(Html2MdRenderer.to_markdown("just text"), "just text");
    }
}
