use pulldown_cmark::{html, Options, Parser};

/// Render an editor-authored page body to HTML that is safe to inject.
///
/// Content comes from the CMS, so raw HTML in the source is sanitized: script
/// and style elements, event handler attributes and `javascript:` URLs are
/// removed. External links open with `rel="noopener noreferrer"`.
pub fn render_page_body(raw: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_SMART_PUNCTUATION;

    let parser = Parser::new_ext(raw, options);
    let mut unsafe_html = String::new();
    html::push_html(&mut unsafe_html, parser);

    ammonia::Builder::default()
        .link_rel(Some("noopener noreferrer"))
        .clean(&unsafe_html)
        .to_string()
}
