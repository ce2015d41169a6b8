use htmd::options::{CodeBlockStyle, HeadingStyle, LinkStyle, Options};
use htmd::{Element, HtmlToMarkdown};
use std::io;

/// Elements removed together with everything inside them.
pub const DELETED_TAGS: &[&str] = &[
    "script", "noscript", "canvas", "embed", "object", "param", "svg", "source", "nav", "iframe",
];

/// Wrapper elements replaced by their content.
pub const STRIPPED_TAGS: &[&str] = &[
    "div", "span", "small", "aside", "section", "article", "header", "footer", "hgroup", "time",
    "address", "button",
];

/// An HTML→Markdown transformation capability.
pub trait MarkdownEngine {
    fn html_to_markdown(&self, html: &str) -> io::Result<String>;
}

/// Default engine backed by `htmd`.
pub struct HtmdEngine {
    converter: HtmlToMarkdown,
}

impl Default for HtmdEngine {
    fn default() -> Self {
        let options = Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            link_style: LinkStyle::Inlined,
            ..Default::default()
        };
        let converter = HtmlToMarkdown::builder()
            .skip_tags(DELETED_TAGS.to_vec())
            .options(options)
            .add_handler(vec!["em", "i"], asterisk_emphasis)
            .add_handler(STRIPPED_TAGS.to_vec(), keep_content)
            .build();
        Self { converter }
    }
}

/// `*text*`, keeping surrounding whitespace outside the markers.
fn asterisk_emphasis(element: Element) -> Option<String> {
    let content = element.content;
    let inner = content.trim();
    if inner.is_empty() {
        return None;
    }
    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];
    Some(format!("{leading}*{inner}*{trailing}"))
}

fn keep_content(element: Element) -> Option<String> {
    Some(element.content.to_string())
}

impl MarkdownEngine for HtmdEngine {
    fn html_to_markdown(&self, html: &str) -> io::Result<String> {
        self.converter.convert(html)
    }
}

impl<F> MarkdownEngine for F
where
    F: Fn(&str) -> io::Result<String>,
{
    fn html_to_markdown(&self, html: &str) -> io::Result<String> {
        self(html)
    }
}
