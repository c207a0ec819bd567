//! Paragraph styles referenced by the body.

use docx_rs::{Docx, Style, StyleType};

pub const LIST_PARAGRAPH: &str = "ListParagraph";

/// Style id for a 0-based heading level, from `Heading1` to `Heading6`.
pub fn heading_style(level: u8) -> String {
    format!("Heading{}", level.min(5) + 1)
}

pub fn add_styles(docx: Docx) -> Docx {
    let docx = [32, 28, 26, 24, 22, 20]
        .into_iter()
        .enumerate()
        .fold(docx, |docx, (level, size)| {
            let style = Style::new(&heading_style(level as u8), StyleType::Paragraph)
                .name(&format!("Heading {}", level + 1))
                .size(size)
                .bold();
            docx.add_style(style)
        });
    docx.add_style(Style::new(LIST_PARAGRAPH, StyleType::Paragraph).name("List Paragraph"))
}
