use crate::convert::model::ListKind;

/// Closed classification of element names the converter cares about.
///
/// html5ever lowercases tag names, so matching is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    List(ListKind),
    ListItem,
    /// 0-based heading level.
    Heading(u8),
    Paragraph,
    Container,
    Bold,
    Italic,
    Underline,
    Anchor,
    LineBreak,
    /// Known phrasing elements with no formatting of their own.
    Inline,
    /// Subtrees whose text never reaches the document.
    Ignored,
    Other,
}

impl Tag {
    pub fn classify(name: &str) -> Tag {
        match name {
            "ul" => Tag::List(ListKind::Bullet),
            "ol" => Tag::List(ListKind::Ordered),
            "li" => Tag::ListItem,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Tag::Heading(heading_level(name)),
            "p" => Tag::Paragraph,
            "div" => Tag::Container,
            "strong" | "b" => Tag::Bold,
            "em" | "i" => Tag::Italic,
            "u" => Tag::Underline,
            "a" => Tag::Anchor,
            "br" => Tag::LineBreak,
            "span" | "code" | "small" | "sub" | "sup" | "mark" | "s" | "strike" | "del"
            | "ins" | "font" | "abbr" | "cite" | "q" | "kbd" | "samp" | "var" | "label" => {
                Tag::Inline
            }
            "script" | "style" | "template" | "head" | "title" | "noscript" => Tag::Ignored,
            _ => Tag::Other,
        }
    }

    /// Tags that contribute runs rather than blocks.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            Tag::Bold | Tag::Italic | Tag::Underline | Tag::Anchor | Tag::LineBreak | Tag::Inline
        )
    }
}

/// `hN` → N - 1, clamped to 0..=5.
fn heading_level(name: &str) -> u8 {
    name[1..]
        .parse::<u8>()
        .map(|n| n.saturating_sub(1).min(5))
        .unwrap_or(0)
}
