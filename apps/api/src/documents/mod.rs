// Document download / export API.
// Stored HTML is fetched from S3 and either converted to DOCX in-process or
// handed to the headless renderer for PDF.

pub mod export;
pub mod format;
pub mod handlers;
pub mod storage;
