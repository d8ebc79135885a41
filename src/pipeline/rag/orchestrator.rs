use std::path::{Path, PathBuf};

use super::prompt::{
    build_general_prompt, build_multi_document_summary_prompt, build_prescription_prompt,
    build_report_prompt,
};
use super::retrieval::Retriever;
use super::types::TextGenerator;
use super::RagError;
use crate::config;
use crate::models::Category;
use crate::pipeline::extraction::types::TextExtractor;
use crate::pipeline::storage::types::{EmbeddingModel, VectorStore};

/// Guidance returned when a single uploaded document yields no usable
/// text. Distinct from any generated answer: the model is never called.
pub const UNREADABLE_DOCUMENT_GUIDANCE: &str =
    "It looks like you may have attached the wrong document, or its quality is too low \
     to extract text. Please upload a clearer copy and try again.";

/// Inserted between documents when joining multi-document text.
pub const DOCUMENT_DELIMITER: &str = "--- NEW DOCUMENT ---";

/// Extracted text shorter than this is treated as unusable in
/// multi-document summaries.
const MIN_DOCUMENT_TEXT_LEN: usize = 15;

/// The four answer-producing operations the boundary layer calls.
///
/// Composes retrieval, prompt assembly and generation over trait seams;
/// every collaborator is constructed once at process start and passed in
/// by reference.
pub struct MedicalAssistant<'a, G, E, V, X>
where
    G: TextGenerator,
    E: EmbeddingModel,
    V: VectorStore,
    X: TextExtractor,
{
    generator: &'a G,
    embedder: &'a E,
    store: &'a V,
    extractor: &'a X,
    top_k: usize,
}

impl<'a, G, E, V, X> MedicalAssistant<'a, G, E, V, X>
where
    G: TextGenerator,
    E: EmbeddingModel,
    V: VectorStore,
    X: TextExtractor,
{
    pub fn new(generator: &'a G, embedder: &'a E, store: &'a V, extractor: &'a X) -> Self {
        Self {
            generator,
            embedder,
            store,
            extractor,
            top_k: config::DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    fn retriever(&self) -> Retriever<'a, E, V> {
        Retriever::new(self.embedder, self.store)
    }

    /// General Q&A over the whole knowledge base.
    pub fn answer_general(&self, question: &str) -> Result<String, RagError> {
        let snippets = self.retriever().retrieve(question, self.top_k, None)?;
        let prompt = build_general_prompt(question, &snippets);
        self.generator.generate(&prompt)
    }

    /// Lab-report analysis: extracted report text retrieved against the
    /// lab-reference knowledge. An unreadable report short-circuits to
    /// fixed guidance before any retrieval or generation.
    pub fn answer_report(&self, question: &str, path: &Path) -> Result<String, RagError> {
        let Some(report_text) = self.usable_text(path, 1) else {
            return Ok(UNREADABLE_DOCUMENT_GUIDANCE.to_string());
        };

        let snippets =
            self.retriever()
                .retrieve(&report_text, self.top_k, Some(Category::LabTest))?;
        let prompt = build_report_prompt(question, &report_text, &snippets);
        self.generator.generate(&prompt)
    }

    /// Prescription interpretation: same shape as report analysis, with
    /// medicine knowledge instead of lab references.
    pub fn answer_prescription(&self, question: &str, path: &Path) -> Result<String, RagError> {
        let Some(prescription_text) = self.usable_text(path, 1) else {
            return Ok(UNREADABLE_DOCUMENT_GUIDANCE.to_string());
        };

        let snippets =
            self.retriever()
                .retrieve(&prescription_text, self.top_k, Some(Category::Medicine))?;
        let prompt = build_prescription_prompt(question, &prescription_text, &snippets);
        self.generator.generate(&prompt)
    }

    /// Combined summary across several documents.
    ///
    /// Each document is extracted independently; an unusable one becomes
    /// an inline warning naming its path, so a single bad upload never
    /// blocks the rest of the batch.
    pub fn summarize_documents(
        &self,
        paths: &[PathBuf],
        question: Option<&str>,
    ) -> Result<String, RagError> {
        let mut sections = Vec::with_capacity(paths.len());
        for path in paths {
            match self.usable_text(path, MIN_DOCUMENT_TEXT_LEN) {
                Some(text) => sections.push(text),
                None => sections.push(format!(
                    "[WARNING] Could not extract text from file: {}. \
                     It may be the wrong file or too low quality.",
                    path.display()
                )),
            }
        }

        let combined = sections.join(&format!("\n\n{DOCUMENT_DELIMITER}\n\n"));
        let prompt = build_multi_document_summary_prompt(&combined, question);
        self.generator.generate(&prompt)
    }

    /// Extracted text, or None when extraction fails or the trimmed text
    /// is shorter than `min_len`. Failures are logged and degrade, never
    /// propagate.
    fn usable_text(&self, path: &Path, min_len: usize) -> Option<String> {
        match self.extractor.extract_text(path) {
            Ok(text) if text.trim().len() >= min_len => Some(text),
            Ok(_) => {
                tracing::warn!(path = %path.display(), "Document yielded no usable text");
                None
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Document extraction failed");
                None
            }
        }
    }
}
