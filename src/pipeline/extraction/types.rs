use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::ExtractionError;

/// Document-text-extraction boundary.
///
/// Implementations turn document bytes into plain text. An empty string is
/// a legitimate outcome (blank page, failed OCR) and is handled by callers,
/// never raised as an error. OCR and PDF internals live behind this seam.
pub trait TextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Scripted extractor for tests: returns a canned text per path and an
/// empty string for anything unscripted.
#[derive(Default)]
pub struct MockExtractor {
    outputs: HashMap<PathBuf, String>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.outputs.insert(path.into(), text.into());
        self
    }
}

impl TextExtractor for MockExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        Ok(self.outputs.get(path).cloned().unwrap_or_default())
    }
}
