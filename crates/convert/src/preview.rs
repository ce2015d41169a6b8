//! Markdown preview rendering.
//!
//! `render_html` produces the HTML document body; `preview_blocks` flattens
//! the same event stream into blocks of styled spans for native widgets.

use pulldown_cmark::{html, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

pub const EMPTY_PREVIEW_MESSAGE: &str =
    "No markdown to preview yet. Start typing in the HTML box!";

fn parser_options() -> Options {
    Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS
}

/// Renders Markdown to an HTML fragment.
pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBlock {
    Heading { level: u8, spans: Vec<InlineSpan> },
    Paragraph(Vec<InlineSpan>),
    CodeBlock { language: Option<String>, code: String },
    ListItem {
        depth: usize,
        marker: String,
        spans: Vec<InlineSpan>,
    },
    Quote(Vec<InlineSpan>),
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Empty,
    Blocks(Vec<PreviewBlock>),
}

impl Preview {
    pub fn is_empty(&self) -> bool {
        matches!(self, Preview::Empty)
    }
}

#[derive(Default, Clone, Copy)]
struct InlineStyle {
    strong: usize,
    emphasis: usize,
    strikethrough: usize,
}

enum Open {
    Heading(u8),
    Paragraph,
    Item,
    Quote,
    Code(Option<String>),
}

/// Flattens Markdown into preview blocks. Blank input yields [`Preview::Empty`].
pub fn preview_blocks(markdown: &str) -> Preview {
    if markdown.trim().is_empty() {
        return Preview::Empty;
    }

    let mut blocks = Vec::new();
    let mut spans: Vec<InlineSpan> = Vec::new();
    let mut code = String::new();
    let mut open: Vec<Open> = Vec::new();
    // Ordered lists carry their next number, bullets carry `None`.
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut item_markers: Vec<String> = Vec::new();
    let mut style = InlineStyle::default();
    let mut link: Option<String> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Heading(level, _, _)) => open.push(Open::Heading(heading_level(level))),
            Event::Start(Tag::Paragraph) => {
                if !matches!(open.last(), Some(Open::Item) | Some(Open::Quote)) {
                    open.push(Open::Paragraph);
                } else if !spans.is_empty() {
                    push_span(&mut spans, " ", style, None, false);
                }
            }
            Event::Start(Tag::BlockQuote) => open.push(Open::Quote),
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                open.push(Open::Code(language));
            }
            Event::Start(Tag::List(start)) => lists.push(start),
            Event::Start(Tag::Item) => {
                flush_item(&mut blocks, &mut spans, &item_markers, lists.len());
                let marker = match lists.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{next}.");
                        *next += 1;
                        marker
                    }
                    _ => "•".to_string(),
                };
                item_markers.push(marker);
                open.push(Open::Item);
            }
            Event::Start(Tag::Emphasis) => style.emphasis += 1,
            Event::Start(Tag::Strong) => style.strong += 1,
            Event::Start(Tag::Strikethrough) => style.strikethrough += 1,
            Event::Start(Tag::Link(_, url, _)) => link = Some(url.to_string()),
            Event::End(Tag::Emphasis) => style.emphasis = style.emphasis.saturating_sub(1),
            Event::End(Tag::Strong) => style.strong = style.strong.saturating_sub(1),
            Event::End(Tag::Strikethrough) => {
                style.strikethrough = style.strikethrough.saturating_sub(1)
            }
            Event::End(Tag::Link(..)) => link = None,
            Event::End(Tag::List(_)) => {
                lists.pop();
            }
            Event::End(Tag::Paragraph) => {
                if matches!(open.last(), Some(Open::Paragraph)) {
                    close_block(
                        &mut open,
                        &mut blocks,
                        &mut spans,
                        &mut code,
                        &mut item_markers,
                        lists.len(),
                    );
                }
            }
            Event::End(Tag::Heading(..))
            | Event::End(Tag::BlockQuote)
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_)) => {
                close_block(
                    &mut open,
                    &mut blocks,
                    &mut spans,
                    &mut code,
                    &mut item_markers,
                    lists.len(),
                );
            }
            Event::Text(text) => {
                if matches!(open.last(), Some(Open::Code(_))) {
                    code.push_str(&text);
                } else {
                    push_span(&mut spans, &text, style, link.as_deref(), false);
                }
            }
            Event::Code(text) => push_span(&mut spans, &text, style, link.as_deref(), true),
            Event::SoftBreak => push_span(&mut spans, " ", style, link.as_deref(), false),
            Event::HardBreak => push_span(&mut spans, "\n", style, link.as_deref(), false),
            Event::TaskListMarker(done) => {
                let mark = if done { "[x] " } else { "[ ] " };
                push_span(&mut spans, mark, style, None, false);
            }
            Event::Rule => blocks.push(PreviewBlock::Rule),
            Event::Html(raw) => push_span(&mut spans, &raw, style, None, true),
            _ => {}
        }
    }

    if !spans.is_empty() {
        blocks.push(PreviewBlock::Paragraph(spans));
    }
    Preview::Blocks(blocks)
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn push_span(
    spans: &mut Vec<InlineSpan>,
    text: &str,
    style: InlineStyle,
    link: Option<&str>,
    code: bool,
) {
    spans.push(InlineSpan {
        text: text.to_string(),
        strong: style.strong > 0,
        emphasis: style.emphasis > 0,
        strikethrough: style.strikethrough > 0,
        code,
        link: link.map(str::to_string),
    });
}

// A nested list starts inside its parent item, so the parent's text so far
// becomes its own block before the child items.
fn flush_item(
    blocks: &mut Vec<PreviewBlock>,
    spans: &mut Vec<InlineSpan>,
    item_markers: &[String],
    list_depth: usize,
) {
    if spans.is_empty() {
        return;
    }
    if let Some(marker) = item_markers.last() {
        blocks.push(PreviewBlock::ListItem {
            depth: list_depth.saturating_sub(2),
            marker: marker.clone(),
            spans: std::mem::take(spans),
        });
    }
}

fn close_block(
    open: &mut Vec<Open>,
    blocks: &mut Vec<PreviewBlock>,
    spans: &mut Vec<InlineSpan>,
    code: &mut String,
    item_markers: &mut Vec<String>,
    list_depth: usize,
) {
    let Some(block) = open.pop() else {
        return;
    };
    match block {
        Open::Heading(level) => blocks.push(PreviewBlock::Heading {
            level,
            spans: std::mem::take(spans),
        }),
        Open::Paragraph => {
            if !spans.is_empty() {
                blocks.push(PreviewBlock::Paragraph(std::mem::take(spans)));
            }
        }
        Open::Quote => {
            if !spans.is_empty() {
                blocks.push(PreviewBlock::Quote(std::mem::take(spans)));
            }
        }
        Open::Item => {
            let marker = item_markers.pop().unwrap_or_default();
            if !spans.is_empty() {
                blocks.push(PreviewBlock::ListItem {
                    depth: list_depth.saturating_sub(1),
                    marker,
                    spans: std::mem::take(spans),
                });
            }
        }
        Open::Code(language) => blocks.push(PreviewBlock::CodeBlock {
            language,
            code: std::mem::take(code),
        }),
    }
}
