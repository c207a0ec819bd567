//! Block and run conversion into document paragraphs.

use docx_rs::{BreakType, Hyperlink, HyperlinkType, IndentLevel, NumberingId, Paragraph, Run};

use crate::convert::{Block, TextRun};
use crate::docx::numbering::MAX_LIST_LEVEL;
use crate::docx::styles::{heading_style, LIST_PARAGRAPH};

/// Builds the paragraph for `block`. `num_id` is the numbering assigned to a
/// list item and is ignored for other blocks.
pub fn paragraph(block: &Block, num_id: Option<usize>) -> Paragraph {
    let mut para = match block {
        Block::Paragraph { .. } => Paragraph::new(),
        Block::Heading { level, .. } => Paragraph::new().style(&heading_style(*level)),
        Block::ListItem { level, .. } => {
            let para = Paragraph::new().style(LIST_PARAGRAPH);
            match num_id {
                Some(id) => para.numbering(
                    NumberingId::new(id),
                    IndentLevel::new((*level as usize).min(MAX_LIST_LEVEL)),
                ),
                None => para,
            }
        }
    };

    for (i, text_run) in block.runs().iter().enumerate() {
        let run = run(text_run, i > 0 && text_run.space_before);
        para = match &text_run.style.href {
            Some(href) => {
                let link = Hyperlink::new(href.as_str(), HyperlinkType::External).add_run(run);
                para.add_hyperlink(link)
            }
            None => para.add_run(run),
        };
    }
    para
}

fn run(text_run: &TextRun, leading_space: bool) -> Run {
    if text_run.is_break() {
        return Run::new().add_break(BreakType::TextWrapping);
    }

    // Control characters other than tab and newline are not valid XML 1.0.
    let mut text: String = text_run
        .text
        .chars()
        .filter(|c| !c.is_control() || *c == '\t' || *c == '\n')
        .collect();
    if leading_space {
        text.insert(0, ' ');
    }

    let style = &text_run.style;
    let mut run = Run::new().add_text(text);
    if style.bold {
        run = run.bold();
    }
    if style.italic {
        run = run.italic();
    }
    if let Some(color) = &style.color {
        run = run.color(color.as_str());
    }
    if style.underline {
        run = run.underline("single");
    }
    run
}
