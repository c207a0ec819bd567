use std::fmt;
use std::str::FromStr;

use crate::docx::DOCX_CONTENT_TYPE;
use crate::errors::AppError;
use crate::render::PDF_CONTENT_TYPE;

/// Requested output kind for a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Structured word-processor document.
    Docx,
    /// Fixed-layout pages.
    Pdf,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Docx => DOCX_CONTENT_TYPE,
            OutputFormat::Pdf => PDF_CONTENT_TYPE,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(OutputFormat::Docx),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(AppError::Validation(format!(
                "format must be 'docx' or 'pdf', got '{other}'"
            ))),
        }
    }
}

/// Safe attachment filename: ASCII letters, digits, `-`, `_`, `.` and spaces
/// survive; anything else becomes `_`. Falls back to `document`.
pub fn attachment_filename(title: &str, format: OutputFormat) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let suffix = format!(".{}", format.extension());
    let stem = cleaned
        .strip_suffix(suffix.as_str())
        .unwrap_or(&cleaned)
        .trim_matches(|c: char| matches!(c, '.' | ' ' | '_'));
    let stem = if stem.is_empty() { "document" } else { stem };
    format!("{stem}{suffix}")
}

pub fn content_disposition(title: &str, format: OutputFormat) -> String {
    format!(
        "attachment; filename=\"{}\"",
        attachment_filename(title, format)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("docx".parse::<OutputFormat>().unwrap(), OutputFormat::Docx);
        assert_eq!(" PDF ".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert!(matches!(
            "odt".parse::<OutputFormat>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_filename_is_sanitized() {
        assert_eq!(
            attachment_filename("Acme / Senior \"Rust\" Engineer", OutputFormat::Docx),
            "Acme _ Senior _Rust_ Engineer.docx"
        );
    }

    #[test]
    fn test_filename_fallback_and_existing_extension() {
        assert_eq!(attachment_filename("  ", OutputFormat::Pdf), "document.pdf");
        assert_eq!(attachment_filename("résumé", OutputFormat::Pdf), "r_sum.pdf");
        assert_eq!(
            attachment_filename("cover-letter.docx", OutputFormat::Docx),
            "cover-letter.docx"
        );
    }

    #[test]
    fn test_content_disposition_header() {
        assert_eq!(
            content_disposition("Resume", OutputFormat::Pdf),
            "attachment; filename=\"Resume.pdf\""
        );
    }
}
