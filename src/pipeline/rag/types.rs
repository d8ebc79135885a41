use serde::{Deserialize, Serialize};

use super::RagError;

/// A knowledge snippet returned by retrieval.
///
/// Payload fields missing on the stored point read as empty strings; a
/// half-filled snippet is still usable prompt context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedSnippet {
    pub score: f32,
    pub text: String,
    pub category: String,
    pub name: String,
}

/// Text-generation seam: one prompt in, one completion out.
///
/// The model behind it is a black box expected to decode
/// deterministically with a bounded output length.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, RagError>;
}
