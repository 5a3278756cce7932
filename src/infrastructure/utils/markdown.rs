use std::borrow::Cow;

use pulldown_cmark::{html, Options, Parser};
use ammonia::{Builder, UrlRelative};

const ANCHOR_TAGS: [&str; 8] = ["h1", "h2", "h3", "h4", "h5", "h6", "div", "li"];

/// Converts Markdown content to sanitized HTML to prevent XSS attacks.
pub fn safe_markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = Parser::new_ext(markdown, options);

    let mut raw_html = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut raw_html, parser);

    sanitize_html(&raw_html)
}

/// In-page anchors survive; every other relative URL is dropped.
fn keep_fragments(url: &str) -> Option<Cow<'_, str>> {
    url.starts_with('#').then_some(Cow::Borrowed(url))
}

/// Strips unsafe markup, forcing `rel` on links and dropping relative URLs
/// other than `#fragment` anchors.
pub fn sanitize_html(content: &str) -> String {
    let mut builder = Builder::default();
    builder
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Custom(Box::new(keep_fragments)));
    for tag in ANCHOR_TAGS {
        builder.add_tag_attributes(tag, &["id"]);
    }
    builder.clean(content).to_string()
}
