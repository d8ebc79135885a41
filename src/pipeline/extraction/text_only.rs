use std::fs;
use std::path::Path;

use super::types::TextExtractor;
use super::ExtractionError;

/// Extractor for documents that are already plain UTF-8 text.
///
/// Scanned or binary formats belong to the external OCR collaborator; this
/// covers the direct-read path.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::NotFound(path.to_path_buf()));
        }
        Ok(fs::read_to_string(path)?)
    }
}
