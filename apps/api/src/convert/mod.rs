//! HTML → structured document conversion.
//!
//! Turns the restricted HTML produced by the resume/cover-letter editor
//! (headings, paragraphs, lists, inline emphasis, links, line breaks) into an
//! ordered sequence of [`Block`]s that the DOCX writer serializes.
//!
//! Parsing is tolerant: unclosed tags, stray text and unknown elements degrade
//! to best-effort output. Only a failure of the parser's input stream aborts a
//! conversion.

pub mod model;
pub mod tag;
pub mod walker;

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use thiserror::Error;
use tracing::{debug, error};

pub use model::{Block, ListKind, TextRun};

use crate::convert::walker::Walker;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("HTML parse failed: {0}")]
    Parse(#[from] std::io::Error),
}

/// Converts an HTML string into document blocks.
pub fn convert(html: &str) -> Result<Vec<Block>, ConvertError> {
    convert_bytes(html.as_bytes())
}

/// Converts raw HTML bytes (as fetched from the object store). Invalid UTF-8
/// is decoded lossily.
pub fn convert_bytes(mut bytes: &[u8]) -> Result<Vec<Block>, ConvertError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut bytes)
        .map_err(|e| {
            error!("HTML parse failed, no blocks emitted: {e}");
            ConvertError::Parse(e)
        })?;

    if !dom.errors.is_empty() {
        debug!("HTML parser recovered from {} errors", dom.errors.len());
    }

    let root = find_body(&dom.document).unwrap_or_else(|| dom.document.clone());
    let mut walker = Walker::default();
    walker.walk_children(&root, None);
    let blocks = walker.finish();

    debug!("Converted HTML into {} blocks", blocks.len());
    Ok(blocks)
}

fn find_body(node: &Handle) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if let NodeData::Element { name, .. } = &child.data {
            if &*name.local == "body" {
                return Some(child.clone());
            }
        }
        if let Some(body) = find_body(child) {
            return Some(body);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::model::{TextRunStyle, LINK_COLOR};

    fn texts(block: &Block) -> Vec<&str> {
        block
            .runs()
            .iter()
            .filter(|r| !r.is_break())
            .map(|r| r.text.as_str())
            .collect()
    }

    #[test]
    fn test_paragraph_with_bold_run() {
        let blocks = convert("<p>Hello <strong>World</strong></p>").unwrap();
        assert_eq!(blocks.len(), 1);
        let Block::Paragraph { runs } = &blocks[0] else {
            panic!("expected paragraph, got {:?}", blocks[0]);
        };
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Hello");
        assert!(!runs[0].style.bold);
        assert_eq!(runs[1].text, "World");
        assert!(runs[1].style.bold);
        assert_eq!(blocks[0].plain_text(), "Hello World");
    }

    #[test]
    fn test_heading_levels() {
        let html = "<h1>A</h1><h2>B</h2><h3>C</h3><h4>D</h4><h5>E</h5><h6>F</h6>";
        let levels: Vec<u8> = convert(html)
            .unwrap()
            .iter()
            .map(|b| match b {
                Block::Heading { level, .. } => *level,
                other => panic!("expected heading, got {other:?}"),
            })
            .collect();
        assert_eq!(levels, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_anchor_falls_back_to_href() {
        let blocks = convert(r#"<p><a href="https://x.test"></a></p>"#).unwrap();
        let runs = blocks[0].runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "https://x.test");
        assert_eq!(runs[0].style.href.as_deref(), Some("https://x.test"));
    }

    #[test]
    fn test_anchor_with_url_text() {
        let blocks = convert(r#"<a href="https://x.test">https://x.test</a>"#).unwrap();
        assert_eq!(blocks.len(), 1);
        let runs = blocks[0].runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "https://x.test");
        assert_eq!(runs[0].style.href.as_deref(), Some("https://x.test"));
        assert!(runs[0].style.underline);
        assert_eq!(runs[0].style.color.as_deref(), Some(LINK_COLOR));
    }

    #[test]
    fn test_anchor_flattens_nested_styling() {
        let blocks =
            convert(r#"<p><em><a href="/gh">my <b>GitHub</b> profile</a></em></p>"#).unwrap();
        let runs = blocks[0].runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "my GitHub profile");
        assert!(runs[0].style.italic);
        assert!(!runs[0].style.bold);
    }

    #[test]
    fn test_bullet_list() {
        let blocks = convert("<ul><li>A</li><li>B</li></ul>").unwrap();
        assert_eq!(
            blocks,
            vec![
                Block::ListItem {
                    runs: vec![TextRun::new("A", TextRunStyle::default())],
                    kind: ListKind::Bullet,
                    level: 0,
                    list_id: 0,
                },
                Block::ListItem {
                    runs: vec![TextRun::new("B", TextRunStyle::default())],
                    kind: ListKind::Bullet,
                    level: 0,
                    list_id: 0,
                },
            ]
        );
    }

    #[test]
    fn test_nested_list_levels_and_kinds() {
        let html = "<ol><li>One<ul><li>Sub</li></ul></li><li>Two</li></ol>";
        let items: Vec<(String, ListKind, u32)> = convert(html)
            .unwrap()
            .iter()
            .map(|b| match b {
                Block::ListItem { kind, level, .. } => (b.plain_text(), *kind, *level),
                other => panic!("expected list item, got {other:?}"),
            })
            .collect();
        assert_eq!(
            items,
            vec![
                ("One".to_string(), ListKind::Ordered, 0),
                ("Sub".to_string(), ListKind::Bullet, 1),
                ("Two".to_string(), ListKind::Ordered, 0),
            ]
        );
    }

    fn list_ids(html: &str) -> Vec<u32> {
        convert(html)
            .unwrap()
            .iter()
            .filter_map(|b| match b {
                Block::ListItem { list_id, .. } => Some(*list_id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_adjacent_lists_get_distinct_ids() {
        assert_eq!(list_ids("<ol><li>a</li><li>b</li></ol><ol><li>c</li></ol>"), vec![0, 0, 1]);
        assert_eq!(
            list_ids("<ol><li>a</li></ol><ul><li>x</li></ul><ol><li>c</li></ol>"),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_nested_list_items_keep_parent_list_id() {
        let ids = list_ids("<ol><li>One<ol><li>Sub</li></ol></li><li>Two</li></ol>");
        assert_eq!(ids, vec![0, 1, 0]);
    }

    #[test]
    fn test_list_inside_heading_splits_into_blocks() {
        let blocks = convert("<h2>Skills<ul><li>Rust</li></ul></h2>").unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::Heading { level: 1, .. }));
        assert_eq!(blocks[0].plain_text(), "Skills");
        assert!(matches!(
            blocks[1],
            Block::ListItem { kind: ListKind::Bullet, level: 0, .. }
        ));
        assert_eq!(blocks[1].plain_text(), "Rust");
    }

    #[test]
    fn test_text_after_nested_list_starts_new_heading() {
        let blocks = convert("<h3>Before<ol><li>Item</li></ol>After</h3>").unwrap();
        let texts: Vec<String> = blocks.iter().map(Block::plain_text).collect();
        assert_eq!(texts, vec!["Before", "Item", "After"]);
        assert!(matches!(blocks[2], Block::Heading { level: 2, .. }));
    }

    #[test]
    fn test_list_item_with_paragraph_children() {
        let blocks = convert("<ul><li><p>Led <b>team</b></p></li></ul>").unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::ListItem { level: 0, .. }));
        assert_eq!(texts(&blocks[0]), vec!["Led", "team"]);
    }

    #[test]
    fn test_li_outside_list_is_dropped() {
        assert!(convert("<li>Orphan</li>").unwrap().is_empty());
    }

    #[test]
    fn test_empty_paragraph_and_heading_dropped() {
        assert!(convert("<p></p>").unwrap().is_empty());
        assert!(convert("<h2>   </h2><p><br></p>").unwrap().is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(convert("").unwrap().is_empty());
    }

    #[test]
    fn test_div_is_transparent() {
        assert_eq!(
            convert("<div><p>X</p></div>").unwrap(),
            convert("<p>X</p>").unwrap()
        );
    }

    #[test]
    fn test_unknown_block_tag_is_transparent() {
        let blocks = convert("<section><article><h2>Skills</h2></article></section>").unwrap();
        assert!(matches!(blocks.as_slice(), [Block::Heading { level: 1, .. }]));
    }

    #[test]
    fn test_stray_text_becomes_paragraph() {
        let blocks = convert("Loose text<p>Inside</p>").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].plain_text(), "Loose text");
        assert_eq!(blocks[1].plain_text(), "Inside");
    }

    #[test]
    fn test_line_break_stays_in_block() {
        let blocks = convert("<p>Line one<br>Line two</p>").unwrap();
        assert_eq!(blocks.len(), 1);
        let runs = blocks[0].runs();
        assert_eq!(runs.len(), 3);
        assert!(runs[1].is_break());
        assert!(runs[1].text.is_empty());
    }

    #[test]
    fn test_inline_styles_accumulate() {
        let blocks = convert("<p><b><i><u>All</u></i></b></p>").unwrap();
        let style = &blocks[0].runs()[0].style;
        assert!(style.bold && style.italic && style.underline);
    }

    #[test]
    fn test_unknown_inline_tag_keeps_style() {
        let blocks = convert("<p><strong><span>Kept</span></strong></p>").unwrap();
        assert!(blocks[0].runs()[0].style.bold);
    }

    #[test]
    fn test_malformed_markup_degrades() {
        let blocks = convert("<p>Unclosed <b>bold<p>Next").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].plain_text(), "Unclosed bold");
    }

    #[test]
    fn test_head_and_script_content_ignored() {
        let html = "<html><head><title>T</title><style>p{}</style></head>\
                    <body><p>Body</p><script>var x;</script></body></html>";
        let blocks = convert(html).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].plain_text(), "Body");
    }

    #[test]
    fn test_block_count_matches_nonempty_elements() {
        let html = "<h1>Jane Doe</h1><p>Engineer</p><p> </p><h2>Experience</h2>\
                    <ul><li>Shipped</li></ul><p>Thanks</p>";
        let blocks = convert(html).unwrap();
        let non_list = blocks
            .iter()
            .filter(|b| !matches!(b, Block::ListItem { .. }))
            .count();
        assert_eq!(non_list, 4);
        assert_eq!(blocks.len(), 5);
    }

    #[test]
    fn test_every_text_run_is_trimmed_and_nonempty() {
        let html = "<p>  spaced   out  </p><ul><li>  a  <em> b </em></li></ul>";
        for block in convert(html).unwrap() {
            for run in block.runs().iter().filter(|r| !r.is_break()) {
                assert!(!run.text.is_empty());
                assert_eq!(run.text.trim(), run.text);
            }
        }
    }

    #[test]
    fn test_invalid_utf8_bytes_are_tolerated() {
        let blocks = convert_bytes(b"<p>caf\xff</p>").unwrap();
        assert_eq!(blocks.len(), 1);
    }
}
