use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Parser as BlockLexer, Tag, TagEnd};
use regex::Regex;

use crate::error::ParseError;
use crate::ir::{Edge, LayoutType, MAX_LIST_LEVEL, Node, Parsed};
use crate::style::extract_annotation;

static LAYOUT_DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^<!--\s*layout:\s*([a-z]+)\s*-->$").unwrap());

/// Parses an outline document into nodes, edges and the requested layout.
///
/// Empty or whitespace-only input is an empty graph, not an error. The
/// returned graph is always a forest: edges come solely from heading/list
/// nesting.
pub fn parse(text: &str) -> Result<Parsed, ParseError> {
    let (layout, body) = take_layout_directive(text);
    let mut builder = OutlineBuilder::new(layout);
    if !body.trim().is_empty() {
        builder.walk(&body)?;
    }
    Ok(builder.finish())
}

/// Consumes the first non-blank line when it is a layout directive comment.
/// Unrecognized directive values are ignored, not errors; the document must
/// not break on a typo.
fn take_layout_directive(text: &str) -> (LayoutType, String) {
    let lines: Vec<&str> = text.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = LAYOUT_DIRECTIVE_RE.captures(line.trim()) {
            let layout = LayoutType::from_token(&caps[1].to_ascii_lowercase()).unwrap_or_default();
            return (layout, lines[idx + 1..].join("\n"));
        }
        break;
    }
    (LayoutType::default(), text.to_string())
}

/// The block context whose inline text is currently being collected.
enum Context {
    Heading {
        level: u8,
        text: String,
    },
    Item {
        text: String,
    },
    Paragraph {
        image: Option<(String, String)>,
        in_image: bool,
        trailing: String,
    },
    CodeBlock {
        info: String,
        body: String,
    },
}

struct OutlineBuilder {
    layout: LayoutType,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_seq: usize,
    edge_seq: usize,
    group_seq: usize,
    group_id: Option<String>,
    /// One slot per open heading level; a new heading's parent is the nearest
    /// open slot with a strictly smaller level.
    heading_slots: [Option<String>; 6],
    /// Most recent list item per nesting depth. Survives the end of a list so
    /// trailing code blocks and images can attach to the last open item;
    /// cleared by headings and rules.
    list_stack: Vec<String>,
    list_depth: usize,
    context: Option<Context>,
}

impl OutlineBuilder {
    fn new(layout: LayoutType) -> Self {
        Self {
            layout,
            nodes: Vec::new(),
            edges: Vec::new(),
            node_seq: 0,
            edge_seq: 0,
            group_seq: 0,
            group_id: None,
            heading_slots: Default::default(),
            list_stack: Vec::new(),
            list_depth: 0,
            context: None,
        }
    }

    fn finish(self) -> Parsed {
        Parsed {
            nodes: self.nodes,
            edges: self.edges,
            layout: self.layout,
        }
    }

    fn walk(&mut self, body: &str) -> Result<(), ParseError> {
        for event in BlockLexer::new(body) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    if let Some(Context::Item { text }) = self.context.take() {
                        self.finish_item(&text)?;
                    }
                    self.context = Some(Context::Heading {
                        level: level as u8,
                        text: String::new(),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(Context::Heading { level, text }) = self.context.take() {
                        self.finish_heading(level, &text)?;
                    }
                }
                Event::Start(Tag::List(_)) => {
                    // A nested list closes its parent item's text.
                    if let Some(Context::Item { text }) = self.context.take() {
                        self.finish_item(&text)?;
                    }
                    self.list_depth += 1;
                }
                Event::End(TagEnd::List(_)) => {
                    self.list_depth = self.list_depth.saturating_sub(1);
                }
                Event::Start(Tag::Item) => {
                    self.context = Some(Context::Item {
                        text: String::new(),
                    });
                }
                Event::End(TagEnd::Item) => {
                    if let Some(Context::Item { text }) = self.context.take() {
                        self.finish_item(&text)?;
                    }
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    if let Some(Context::Item { text }) = self.context.take() {
                        self.finish_item(&text)?;
                    }
                    let info = match kind {
                        CodeBlockKind::Fenced(info) => info.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    self.context = Some(Context::CodeBlock {
                        info,
                        body: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(Context::CodeBlock { info, body }) = self.context.take() {
                        self.finish_code(&info, &body)?;
                    }
                }
                Event::Start(Tag::Paragraph) => {
                    // Loose list items wrap their text in paragraphs; keep
                    // collecting into the item instead.
                    if let Some(Context::Item { text }) = &mut self.context {
                        if !text.is_empty() {
                            text.push(' ');
                        }
                    } else {
                        self.context = Some(Context::Paragraph {
                            image: None,
                            in_image: false,
                            trailing: String::new(),
                        });
                    }
                }
                Event::End(TagEnd::Paragraph) => {
                    if matches!(self.context, Some(Context::Paragraph { .. })) {
                        if let Some(Context::Paragraph { image, trailing, .. }) =
                            self.context.take()
                        {
                            self.finish_paragraph(image, &trailing)?;
                        }
                    }
                }
                Event::Start(Tag::Image { dest_url, .. }) => {
                    if let Some(Context::Paragraph { image, in_image, .. }) = &mut self.context {
                        *image = Some((dest_url.to_string(), String::new()));
                        *in_image = true;
                    }
                }
                Event::End(TagEnd::Image) => {
                    if let Some(Context::Paragraph { in_image, .. }) = &mut self.context {
                        *in_image = false;
                    }
                }
                Event::Text(text) | Event::Code(text) => self.push_text(&text),
                Event::SoftBreak | Event::HardBreak => self.push_text(" "),
                Event::Rule => self.start_group(),
                _ => {}
            }
        }
        Ok(())
    }

    fn push_text(&mut self, chunk: &str) {
        match &mut self.context {
            Some(Context::Heading { text, .. }) | Some(Context::Item { text }) => {
                text.push_str(chunk);
            }
            Some(Context::CodeBlock { body, .. }) => body.push_str(chunk),
            Some(Context::Paragraph {
                image,
                in_image,
                trailing,
            }) => {
                if *in_image {
                    if let Some((_, alt)) = image {
                        alt.push_str(chunk);
                    }
                } else {
                    trailing.push_str(chunk);
                }
            }
            None => {}
        }
    }

    /// A rule opens a new section: fresh group id, no cross-section parenting.
    fn start_group(&mut self) {
        self.group_seq += 1;
        self.group_id = Some(format!("g{}", self.group_seq));
        self.heading_slots = Default::default();
        self.list_stack.clear();
    }

    fn finish_heading(&mut self, level: u8, raw: &str) -> Result<(), ParseError> {
        let (content, style) = extract_annotation(raw);
        let id = self.next_node_id();
        let node = Node::header(id.clone(), content, style, level)?;
        let slot = (level - 1) as usize;
        let parent = self.heading_slots[..slot]
            .iter()
            .rev()
            .find_map(|open| open.clone());
        self.push_node(node, parent)?;
        for deeper in &mut self.heading_slots[slot..] {
            *deeper = None;
        }
        self.heading_slots[slot] = Some(id);
        self.list_stack.clear();
        Ok(())
    }

    fn finish_item(&mut self, raw: &str) -> Result<(), ParseError> {
        let depth = self.list_depth.max(1);
        let level = depth.min(MAX_LIST_LEVEL as usize) as u8;
        let (content, style) = extract_annotation(raw);
        let id = self.next_node_id();
        let node = Node::text(id.clone(), content, style, level)?;
        self.list_stack.truncate(depth - 1);
        let parent = self
            .list_stack
            .last()
            .cloned()
            .or_else(|| self.deepest_heading());
        self.push_node(node, parent)?;
        self.list_stack.push(id);
        Ok(())
    }

    fn finish_code(&mut self, info: &str, body: &str) -> Result<(), ParseError> {
        let (info_content, style) = extract_annotation(info);
        let language = info_content
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_string();
        let content = body.strip_suffix('\n').unwrap_or(body).to_string();
        let id = self.next_node_id();
        let node = Node::code(id, content, style, language)?;
        let parent = self.block_anchor();
        self.push_node(node, parent)
    }

    fn finish_paragraph(
        &mut self,
        image: Option<(String, String)>,
        trailing: &str,
    ) -> Result<(), ParseError> {
        // Plain paragraphs are not part of the outline format.
        let Some((url, alt)) = image else {
            return Ok(());
        };
        if url.is_empty() {
            return Ok(());
        }
        let (_, style) = extract_annotation(trailing);
        let id = self.next_node_id();
        let node = Node::image(id, url, alt.trim().to_string(), style)?;
        let parent = self.block_anchor();
        self.push_node(node, parent)
    }

    /// Code blocks and images attach to the innermost open list item, else the
    /// deepest open heading, else they stand as roots.
    fn block_anchor(&self) -> Option<String> {
        self.list_stack
            .last()
            .cloned()
            .or_else(|| self.deepest_heading())
    }

    fn deepest_heading(&self) -> Option<String> {
        self.heading_slots.iter().rev().find_map(|open| open.clone())
    }

    fn push_node(&mut self, mut node: Node, parent: Option<String>) -> Result<(), ParseError> {
        node.group_id = self.group_id.clone();
        if let Some(parent_id) = parent {
            self.edge_seq += 1;
            let edge = Edge::new(format!("e{}", self.edge_seq), parent_id, node.id.clone())?;
            self.edges.push(edge);
        }
        self.nodes.push(node);
        Ok(())
    }

    fn next_node_id(&mut self) -> String {
        self.node_seq += 1;
        format!("n{}", self.node_seq)
    }
}
