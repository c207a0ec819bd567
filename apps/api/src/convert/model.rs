//! Output model of the HTML converter.
//!
//! A conversion produces a flat, ordered `Vec<Block>`. Lists are not nested
//! structurally: every item carries its own `kind`, nesting `level` and the
//! id of the `ul`/`ol` element it came from.

use serde::{Deserialize, Serialize};

/// Colour applied to hyperlink runs (Word's default "Hyperlink" blue).
pub const LINK_COLOR: &str = "0563C1";

/// Formatting accumulated while descending through inline tags.
///
/// Children receive a copy and may only extend it; a parent's style is never
/// mutated by its subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl TextRunStyle {
    pub fn with_bold(&self) -> Self {
        Self {
            bold: true,
            ..self.clone()
        }
    }

    pub fn with_italic(&self) -> Self {
        Self {
            italic: true,
            ..self.clone()
        }
    }

    pub fn with_underline(&self) -> Self {
        Self {
            underline: true,
            ..self.clone()
        }
    }

    /// Link styling: underline, fixed link colour and the target.
    pub fn with_link(&self, href: &str) -> Self {
        Self {
            underline: true,
            color: Some(LINK_COLOR.to_string()),
            href: (!href.is_empty()).then(|| href.to_string()),
            ..self.clone()
        }
    }
}

/// A contiguous span of text sharing one style, or a hard line break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// Trimmed, whitespace-collapsed text. Empty only for line breaks.
    pub text: String,
    pub style: TextRunStyle,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub line_break: bool,
    /// Source whitespace separated this run from the previous one in the block.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub space_before: bool,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: TextRunStyle) -> Self {
        Self {
            text: text.into(),
            style,
            line_break: false,
            space_before: false,
        }
    }

    pub fn line_break() -> Self {
        Self {
            text: String::new(),
            style: TextRunStyle::default(),
            line_break: true,
            space_before: false,
        }
    }

    pub fn is_break(&self) -> bool {
        self.line_break
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// One structural unit of output document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        runs: Vec<TextRun>,
    },
    /// `level` is 0-based: `h1` is 0 and `h6` is 5.
    Heading {
        level: u8,
        runs: Vec<TextRun>,
    },
    ListItem {
        runs: Vec<TextRun>,
        kind: ListKind,
        level: u32,
        /// Distinct for every list element in the document, in source order.
        list_id: u32,
    },
}

impl Block {
    pub fn runs(&self) -> &[TextRun] {
        match self {
            Block::Paragraph { runs } | Block::Heading { runs, .. } | Block::ListItem { runs, .. } => {
                runs
            }
        }
    }

    /// Run texts joined the way a reader sees them.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for run in self.runs() {
            if run.is_break() {
                out.push('\n');
                continue;
            }
            if run.space_before && !out.is_empty() && !out.ends_with('\n') {
                out.push(' ');
            }
            out.push_str(&run.text);
        }
        out
    }
}

/// Transient state while walking a `ul`/`ol` subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListContext {
    pub kind: ListKind,
    pub level: u32,
    pub id: u32,
}

impl ListContext {
    /// Context for a list opened inside `parent` (or at top level).
    /// The kind always comes from the list's own tag.
    pub fn open(parent: Option<ListContext>, kind: ListKind, id: u32) -> Self {
        let level = parent.map_or(0, |p| p.level + 1);
        ListContext { kind, level, id }
    }
}
