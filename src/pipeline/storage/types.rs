use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StorageError;
use crate::models::Category;

/// Distance metric for the vector collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distance {
    Cosine,
    Dot,
    Euclid,
}

impl Distance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "Cosine",
            Self::Dot => "Dot",
            Self::Euclid => "Euclid",
        }
    }
}

/// Payload stored alongside each vector. Fields default to empty strings
/// when a stored record predates the current schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointPayload {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
}

/// A point ready for upsert: deterministic id, normalized vector, payload.
#[derive(Debug, Clone)]
pub struct PointRecord {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

/// A point returned by a similarity query, with its score.
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    pub score: f32,
    pub payload: PointPayload,
}

/// Embedding model abstraction
pub trait EmbeddingModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, StorageError>;
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, StorageError>;
    fn dimension(&self) -> usize;
}

/// Allow `Box<dyn EmbeddingModel>` to be used as `&impl EmbeddingModel`.
impl EmbeddingModel for Box<dyn EmbeddingModel> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, StorageError> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, StorageError> {
        (**self).embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// Vector store abstraction over one persistent collection.
pub trait VectorStore {
    /// Create the collection if absent; an existing collection is left
    /// untouched, populated or not.
    fn ensure_collection(&self, dimension: usize, distance: Distance) -> Result<(), StorageError>;

    /// Insert-or-replace by point id. Implementations flush in bounded
    /// batches to cap request size.
    fn upsert(&self, points: &[PointRecord]) -> Result<(), StorageError>;

    /// Lazily enumerate every stored payload (no vectors), following the
    /// pagination cursor until the collection is exhausted.
    fn scroll_all<'a>(
        &'a self,
        page_size: usize,
    ) -> Box<dyn Iterator<Item = Result<PointPayload, StorageError>> + 'a>;

    /// Up to `top_k` nearest points, optionally restricted to an exact
    /// category match.
    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        category: Option<Category>,
    ) -> Result<Vec<ScoredPoint>, StorageError>;
}
