use once_cell::sync::Lazy;
use pulldown_cmark::{
    Event as MdEvent, HeadingLevel, Options, Parser as MdParser, Tag as MdTag,
    TagEnd as MdTagEnd,
};
use regex::Regex;
use std::result::Result;

use crate::{
    codec::FragmentCodec,
    error::DocweaveError,
    fragment::{Fragment, FragmentNode, MEMBER_TAG},
};

pub use pulldown_cmark;

/// Link destinations with this scheme are cross-reference markers: `[Circle](cref:T:Acme.Circle)`.
pub const CREF_SCHEME: &str = "cref:";

/// Doc-comment tags embedded as HTML: `<inheritdoc/>`, `<see cref="..."/>`, `<seealso .../>`.
static DOC_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\s*(/)?\s*(inheritdoc|seealso|see)\b([^>]*?)(/)?\s*>")
        .expect("doc tag pattern is a valid regex")
});

static DOC_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(cref|langword|href)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("doc attribute pattern is a valid regex")
});

/// Any other markup tag, dropped from the text.
static OTHER_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is a valid regex"));

pub fn doc_md_options() -> Options {
    let mut md_options = Options::empty();
    md_options.insert(Options::ENABLE_STRIKETHROUGH);
    md_options.insert(Options::ENABLE_TABLES);
    md_options
}

/// Decodes Markdown doc text into a [Fragment].
#[derive(Debug, Default, Clone, Copy)]
pub struct MdCodec;

impl FragmentCodec for MdCodec {
    fn decode(&self, content: &str) -> Result<Fragment, DocweaveError> {
        parse_fragment(content)
    }
}

#[derive(Debug)]
enum FrameKind {
    Root,
    Element(String),
    Reference(String),
    /// Opened by an inline `<see cref="...">` and closed by `</see>` rather than a Markdown end
    /// tag.
    HtmlReference(String),
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    children: Vec<FragmentNode>,
}

impl Frame {
    fn new(kind: FrameKind) -> Frame {
        Frame {
            kind,
            children: Vec::new(),
        }
    }

    fn into_node(self) -> Option<FragmentNode> {
        match self.kind {
            FrameKind::Root => None,
            FrameKind::Element(tag) => Some(FragmentNode::Element {
                tag,
                children: self.children,
            }),
            FrameKind::Reference(target) | FrameKind::HtmlReference(target) => {
                Some(FragmentNode::Reference {
                    target,
                    children: self.children,
                })
            }
        }
    }
}

struct FragmentBuilder {
    frames: Vec<Frame>,
}

impl FragmentBuilder {
    fn new() -> FragmentBuilder {
        FragmentBuilder {
            frames: vec![Frame::new(FrameKind::Root)],
        }
    }

    fn push_node(&mut self, node: FragmentNode) {
        if let Some(top) = self.frames.last_mut() {
            top.children.push(node);
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        // Merge adjacent text so html-split runs read as one node
        if let Some(FragmentNode::Text(prev)) =
            self.frames.last_mut().and_then(|top| top.children.last_mut())
        {
            prev.push_str(text);
            return;
        }
        self.push_node(FragmentNode::Text(text.to_string()));
    }

    fn open(&mut self, kind: FrameKind) {
        self.frames.push(Frame::new(kind));
    }

    fn close_top(&mut self) {
        if self.frames.len() < 2 {
            return;
        }
        if let Some(node) = self.frames.pop().and_then(Frame::into_node) {
            self.push_node(node);
        }
    }

    /// Close the innermost Markdown frame, and any html references left open inside it.
    fn close_markdown(&mut self) {
        while matches!(
            self.frames.last().map(|f| &f.kind),
            Some(FrameKind::HtmlReference(_))
        ) {
            self.close_top();
        }
        self.close_top();
    }

    fn close_html_reference(&mut self) {
        if matches!(
            self.frames.last().map(|f| &f.kind),
            Some(FrameKind::HtmlReference(_))
        ) {
            self.close_top();
        }
    }

    fn html(&mut self, html: &str) -> Result<(), DocweaveError> {
        let mut last = 0;
        for caps in DOC_TAG.captures_iter(html) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            self.push_text(&strip_tags(&html[last..whole.start()]));
            last = whole.end();

            let closing = caps.get(1).is_some();
            let name = caps
                .get(2)
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_default();
            let attrs = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
            let self_closing = caps.get(4).is_some();

            match (name.as_str(), closing) {
                ("inheritdoc", false) => self.push_node(FragmentNode::Inherit),
                ("inheritdoc", true) => {}
                (_, true) => self.close_html_reference(),
                (_, false) => match doc_attr(attrs, "cref") {
                    Some(target) if target.is_empty() => {
                        return Err(DocweaveError::Codec(format!(
                            "<{name}> has an empty cref attribute"
                        )));
                    }
                    Some(target) if self_closing => self.push_node(FragmentNode::reference(target)),
                    Some(target) => self.open(FrameKind::HtmlReference(target)),
                    None => {
                        if let Some(word) = doc_attr(attrs, "langword") {
                            self.push_text(&word);
                        }
                    }
                },
            }
        }
        self.push_text(&strip_tags(&html[last..]));
        Ok(())
    }

    fn finish(mut self) -> Fragment {
        while self.frames.len() > 1 {
            self.close_top();
        }
        let children = self
            .frames
            .pop()
            .map(|root| root.children)
            .unwrap_or_default()
            .into_iter()
            .filter(|child| !matches!(child, FragmentNode::Text(text) if text.trim().is_empty()))
            .collect();
        Fragment::new(MEMBER_TAG, children)
    }
}

fn strip_tags(text: &str) -> String {
    OTHER_TAG.replace_all(text, "").into_owned()
}

fn doc_attr(attrs: &str, name: &str) -> Option<String> {
    DOC_ATTR
        .captures_iter(attrs)
        .find(|caps| {
            caps.get(1)
                .map(|m| m.as_str().eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|m| m.as_str().trim().to_string())
}

fn element_tag(tag: &MdTag<'_>) -> &'static str {
    match tag {
        MdTag::Paragraph => "para",
        MdTag::Heading { level, .. } => match level {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        },
        MdTag::BlockQuote(_) => "quote",
        MdTag::CodeBlock(_) => "pre",
        MdTag::List(_) => "list",
        MdTag::Item => "item",
        MdTag::Emphasis => "em",
        MdTag::Strong => "strong",
        MdTag::Strikethrough => "strike",
        MdTag::Link { .. } => "link",
        MdTag::Table(_) => "table",
        MdTag::TableHead | MdTag::TableRow => "row",
        MdTag::TableCell => "cell",
        _ => "span",
    }
}

/// Build a [Fragment] from Markdown doc text.
///
/// `<inheritdoc/>` becomes [FragmentNode::Inherit]. `<see cref="..."/>`, `<seealso cref="..."/>`
/// and links whose destination starts with [CREF_SCHEME] become [FragmentNode::Reference]. An
/// `<inheritdoc/>` on its own line is a top level node, so `is_inherit_only` holds for it; the
/// same tag inside running prose is nested in a paragraph and does not.
///
/// A cross-reference with an empty target is a [DocweaveError::Codec] error.
pub fn parse_fragment(content: &str) -> Result<Fragment, DocweaveError> {
    let mut builder = FragmentBuilder::new();
    for event in MdParser::new_ext(content, doc_md_options()) {
        match event {
            MdEvent::Start(MdTag::HtmlBlock) | MdEvent::End(MdTagEnd::HtmlBlock) => {}
            MdEvent::Start(MdTag::Link { dest_url, .. })
                if dest_url.starts_with(CREF_SCHEME) =>
            {
                let target = dest_url[CREF_SCHEME.len()..].trim().to_string();
                if target.is_empty() {
                    return Err(DocweaveError::Codec(format!(
                        "link '{dest_url}' has no cref target"
                    )));
                }
                builder.open(FrameKind::Reference(target));
            }
            MdEvent::Start(tag) => {
                builder.open(FrameKind::Element(element_tag(&tag).to_string()));
            }
            MdEvent::End(_) => builder.close_markdown(),
            MdEvent::Text(text) => builder.push_text(&text),
            MdEvent::Code(code) => builder.push_node(FragmentNode::element(
                "code",
                vec![FragmentNode::text(code.to_string())],
            )),
            MdEvent::SoftBreak => builder.push_text(" "),
            MdEvent::HardBreak => builder.push_text("\n"),
            MdEvent::Html(html) | MdEvent::InlineHtml(html) => builder.html(&html)?,
            _ => {}
        }
    }
    let fragment = builder.finish();
    tracing::trace!(
        "[codec::md] decoded fragment with {} top level nodes",
        fragment.children.len()
    );
    Ok(fragment)
}
