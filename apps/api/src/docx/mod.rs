//! DOCX writer: serializes converted blocks into an Office Open XML package.

pub mod body;
pub mod numbering;
pub mod styles;

use std::io::Cursor;

use docx_rs::Docx;
use thiserror::Error;
use tracing::debug;

use crate::convert::Block;
use crate::docx::numbering::ListNumbering;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("failed to pack DOCX: {0}")]
    Pack(String),
}

/// Builds the complete `.docx` byte stream for `blocks`.
pub fn write_docx(blocks: &[Block]) -> Result<Vec<u8>, DocxError> {
    let mut numbering = ListNumbering::default();
    let mut docx = styles::add_styles(Docx::new());

    for block in blocks {
        let num_id = match block {
            Block::ListItem {
                kind,
                level,
                list_id,
                ..
            } => {
                let (next, id) = numbering.num_id(docx, *kind, *list_id, *level as usize);
                docx = next;
                Some(id)
            }
            _ => None,
        };
        docx = docx.add_paragraph(body::paragraph(block, num_id));
    }

    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .map_err(|e| DocxError::Pack(e.to_string()))?;

    debug!("Packed {} blocks into {} DOCX bytes", blocks.len(), buffer.len());
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use zip::ZipArchive;

    use super::*;
    use crate::convert::convert;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    fn document_for(html: &str) -> String {
        let bytes = write_docx(&convert(html).unwrap()).unwrap();
        read_part(&bytes, "word/document.xml")
    }

    /// `w:numId` values in body order.
    fn num_ids(document: &str) -> Vec<String> {
        document
            .split(r#"<w:numId w:val=""#)
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_package_contains_all_parts() {
        let bytes = write_docx(&convert("<p>Hi</p>").unwrap()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/numbering.xml",
            "word/_rels/document.xml.rels",
        ] {
            assert!(names.contains(&part), "missing {part}");
        }
    }

    #[test]
    fn test_resume_roundtrips_through_package() {
        let html = r#"<h1>Jane Doe</h1>
            <p>Portfolio: <a href="https://jane.dev">jane.dev</a></p>
            <h2>Experience</h2>
            <ul><li>Cut p99 latency by <strong>40%</strong></li></ul>"#;
        let bytes = write_docx(&convert(html).unwrap()).unwrap();

        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains(r#"w:val="Heading1""#));
        assert!(document.contains(r#"w:val="Heading2""#));
        assert!(document.contains(r#"w:val="ListParagraph""#));
        assert!(document.contains(">Jane Doe</w:t>"));
        assert!(document.contains("<w:hyperlink"));
        assert_eq!(num_ids(&document).len(), 1);

        let rels = read_part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains("https://jane.dev"));

        let styles = read_part(&bytes, "word/styles.xml");
        for rank in 1..=6 {
            assert!(styles.contains(&format!(r#"w:styleId="Heading{rank}""#)));
        }
    }

    #[test]
    fn test_run_text_is_escaped_and_spaced() {
        let document = document_for("<p>R&amp;D <b>&lt;team&gt;</b></p>");
        assert!(document.contains(">R&amp;D</w:t>"));
        assert!(document.contains("> &lt;team&gt;</w:t>"));
    }

    #[test]
    fn test_line_break_becomes_break_run() {
        let document = document_for("<p>A<br>B</p>");
        assert!(document.contains("<w:br"));
    }

    #[test]
    fn test_list_presets() {
        let bytes = write_docx(&convert("<ul><li>a</li></ul><ol><li>b</li></ol>").unwrap()).unwrap();
        let numbering = read_part(&bytes, "word/numbering.xml");
        assert!(numbering.contains(r#"w:val="●""#));
        assert!(numbering.contains(r#"w:val="○""#));
        assert!(numbering.contains(r#"w:val="decimal""#));
        assert!(numbering.contains(r#"w:val="lowerLetter""#));
        assert!(numbering.contains(r#"w:val="%1.""#));
        assert!(numbering.contains(r#"w:left="720""#));
        assert!(numbering.contains(r#"w:left="1440""#));
        assert!(numbering.contains(r#"w:hanging="360""#));
        assert!(numbering.contains(r#"w:startOverride w:val="1""#));
    }

    #[test]
    fn test_adjacent_ordered_lists_restart() {
        let ids = num_ids(&document_for("<ol><li>a</li><li>b</li></ol><ol><li>c</li></ol>"));
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn test_ordered_lists_split_by_bullets_restart() {
        let ids = num_ids(&document_for(
            "<ol><li>a</li><li>b</li></ol><ul><li>x</li></ul><ol><li>c</li></ol>",
        ));
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[0], ids[1]);
        assert_ne!(ids[0], ids[3]);
        assert_ne!(ids[2], ids[3]);
    }

    #[test]
    fn test_bullet_lists_share_numbering() {
        let ids = num_ids(&document_for("<ul><li>a</li></ul><p>gap</p><ul><li>b</li></ul>"));
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], ids[1]);
    }

    #[test]
    fn test_empty_document_is_still_valid_package() {
        let bytes = write_docx(&[]).unwrap();
        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains("<w:body>"));
    }
}
