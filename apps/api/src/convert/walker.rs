//! Depth-first walk over the parsed DOM.
//!
//! Traversal state (the output sequence, the open list context and any stray
//! inline content) lives in `Walker` and is passed down explicitly.

use markup5ever_rcdom::{Handle, NodeData};
use tracing::debug;

use crate::convert::model::{Block, ListContext, ListKind, TextRun, TextRunStyle};
use crate::convert::tag::Tag;

/// Collects runs for one block, tracking whitespace between them.
#[derive(Debug, Default)]
pub struct RunBuffer {
    runs: Vec<TextRun>,
    pending_space: bool,
}

impl RunBuffer {
    pub fn push_text(&mut self, raw: &str, style: &TextRunStyle) {
        let collapsed = collapse_whitespace(raw);
        let text = collapsed.trim();
        if text.is_empty() {
            if !raw.is_empty() {
                self.pending_space = true;
            }
            return;
        }
        let leading = raw.starts_with(char::is_whitespace);
        let trailing = raw.ends_with(char::is_whitespace);
        self.push_run(text, style.clone(), leading, trailing);
    }

    /// An anchor always yields exactly one run: its text content, or the
    /// href when there is none.
    pub fn push_anchor(&mut self, raw_text: &str, href: &str, style: &TextRunStyle) {
        let href = href.trim();
        let collapsed = collapse_whitespace(raw_text);
        let display = match collapsed.trim() {
            "" => href,
            text => text,
        };
        if display.is_empty() {
            return;
        }
        let leading = raw_text.starts_with(char::is_whitespace);
        let trailing = raw_text.ends_with(char::is_whitespace);
        self.push_run(display, style.with_link(href), leading, trailing);
    }

    pub fn push_break(&mut self) {
        self.runs.push(TextRun::line_break());
        self.pending_space = false;
    }

    /// Separates content coming from sibling block elements.
    pub fn soft_separate(&mut self) {
        if self.has_text() {
            self.pending_space = true;
        }
    }

    pub fn has_text(&self) -> bool {
        self.runs.iter().any(|r| !r.is_break())
    }

    pub fn take(&mut self) -> Vec<TextRun> {
        self.pending_space = false;
        std::mem::take(&mut self.runs)
    }

    fn push_run(&mut self, text: &str, style: TextRunStyle, leading: bool, trailing: bool) {
        let follows_text = self.runs.last().is_some_and(|r| !r.is_break());
        let mut run = TextRun::new(text, style);
        run.space_before = follows_text && (self.pending_space || leading);
        self.runs.push(run);
        self.pending_space = trailing;
    }
}

#[derive(Debug, Default)]
pub struct Walker {
    blocks: Vec<Block>,
    /// Inline content found directly under body or a transparent container.
    stray: RunBuffer,
    next_list_id: u32,
}

impl Walker {
    pub fn finish(mut self) -> Vec<Block> {
        self.flush_stray();
        self.blocks
    }

    pub fn walk_children(&mut self, node: &Handle, list: Option<ListContext>) {
        for child in node.children.borrow().iter() {
            self.walk_block(child, list);
        }
    }

    fn walk_block(&mut self, node: &Handle, list: Option<ListContext>) {
        let tag = match &node.data {
            NodeData::Text { contents } => {
                // Text between list items has no item to belong to.
                if list.is_none() {
                    self.stray.push_text(&contents.borrow(), &TextRunStyle::default());
                }
                return;
            }
            NodeData::Element { name, .. } => Tag::classify(&name.local),
            _ => return,
        };

        if tag.is_inline() {
            if list.is_none() {
                collect_inline(node, &TextRunStyle::default(), &mut self.stray);
            }
            return;
        }

        self.flush_stray();
        match tag {
            Tag::List(kind) => {
                let ctx = self.open_list(list, kind);
                self.walk_children(node, Some(ctx));
            }
            Tag::ListItem => match list {
                Some(ctx) => {
                    let mut buf = RunBuffer::default();
                    self.walk_item_content(node, ctx, &mut buf);
                    self.emit_item(&mut buf, ctx);
                }
                None => debug!("Dropping <li> outside of any list"),
            },
            Tag::Heading(level) => self.walk_text_block(node, list, Some(level)),
            Tag::Paragraph => self.walk_text_block(node, list, None),
            Tag::Ignored => {}
            _ => {
                self.walk_children(node, list);
                self.flush_stray();
            }
        }
    }

    /// Heading (`Some(level)`) or paragraph. A list nested directly inside
    /// ends the current block and is walked as list items; the text after it
    /// starts a new block of the same kind.
    fn walk_text_block(
        &mut self,
        node: &Handle,
        list: Option<ListContext>,
        heading: Option<u8>,
    ) {
        let mut buf = RunBuffer::default();
        for child in node.children.borrow().iter() {
            let tag = match &child.data {
                NodeData::Element { name, .. } => Tag::classify(&name.local),
                _ => {
                    collect_inline(child, &TextRunStyle::default(), &mut buf);
                    continue;
                }
            };
            match tag {
                Tag::List(_) => {
                    self.emit_text_block(&mut buf, heading);
                    self.walk_block(child, list);
                }
                _ => collect_inline(child, &TextRunStyle::default(), &mut buf),
            }
        }
        self.emit_text_block(&mut buf, heading);
    }

    fn emit_text_block(&mut self, buf: &mut RunBuffer, heading: Option<u8>) {
        let has_text = buf.has_text();
        let runs = buf.take();
        if !has_text {
            return;
        }
        self.blocks.push(match heading {
            Some(level) => Block::Heading { level, runs },
            None => Block::Paragraph { runs },
        });
    }

    fn open_list(&mut self, parent: Option<ListContext>, kind: ListKind) -> ListContext {
        let ctx = ListContext::open(parent, kind, self.next_list_id);
        self.next_list_id += 1;
        ctx
    }

    /// Gathers an item's runs. A nested list first flushes what was gathered
    /// so the parent item precedes its children.
    fn walk_item_content(&mut self, node: &Handle, ctx: ListContext, buf: &mut RunBuffer) {
        for child in node.children.borrow().iter() {
            let tag = match &child.data {
                NodeData::Element { name, .. } => Tag::classify(&name.local),
                _ => {
                    collect_inline(child, &TextRunStyle::default(), buf);
                    continue;
                }
            };
            match tag {
                Tag::List(kind) => {
                    self.emit_item(buf, ctx);
                    let nested = self.open_list(Some(ctx), kind);
                    self.walk_children(child, Some(nested));
                }
                Tag::Ignored => {}
                t if t.is_inline() => collect_inline(child, &TextRunStyle::default(), buf),
                _ => {
                    buf.soft_separate();
                    self.walk_item_content(child, ctx, buf);
                    buf.soft_separate();
                }
            }
        }
    }

    fn emit_item(&mut self, buf: &mut RunBuffer, ctx: ListContext) {
        let has_text = buf.has_text();
        let runs = buf.take();
        if has_text {
            self.blocks.push(Block::ListItem {
                runs,
                kind: ctx.kind,
                level: ctx.level,
                list_id: ctx.id,
            });
        }
    }

    fn flush_stray(&mut self) {
        let has_text = self.stray.has_text();
        let runs = self.stray.take();
        if has_text {
            self.blocks.push(Block::Paragraph { runs });
        }
    }
}

fn collect_children(node: &Handle, style: &TextRunStyle, buf: &mut RunBuffer) {
    for child in node.children.borrow().iter() {
        collect_inline(child, style, buf);
    }
}

fn collect_inline(node: &Handle, style: &TextRunStyle, buf: &mut RunBuffer) {
    let (name, attrs) = match &node.data {
        NodeData::Text { contents } => {
            buf.push_text(&contents.borrow(), style);
            return;
        }
        NodeData::Element { name, attrs, .. } => (name, attrs),
        _ => return,
    };

    match Tag::classify(&name.local) {
        Tag::Bold => collect_children(node, &style.with_bold(), buf),
        Tag::Italic => collect_children(node, &style.with_italic(), buf),
        Tag::Underline => collect_children(node, &style.with_underline(), buf),
        Tag::Anchor => {
            let href = attrs
                .borrow()
                .iter()
                .find(|a| &*a.name.local == "href")
                .map(|a| a.value.to_string())
                .unwrap_or_default();
            let mut text = String::new();
            text_content(node, &mut text);
            buf.push_anchor(&text, &href, style);
        }
        Tag::LineBreak => buf.push_break(),
        Tag::Ignored => {}
        _ => collect_children(node, style, buf),
    }
}

/// Concatenated descendant text, skipping ignored subtrees.
fn text_content(node: &Handle, out: &mut String) {
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { name, .. } => match Tag::classify(&name.local) {
                Tag::Ignored => {}
                Tag::LineBreak => out.push(' '),
                _ => text_content(child, out),
            },
            _ => {}
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}
