use std::sync::Mutex;

use super::types::{Distance, PointPayload, PointRecord, ScoredPoint, VectorStore};
use super::StorageError;
use crate::models::Category;

/// In-memory vector store for testing and offline development.
///
/// Implements the whole `VectorStore` contract: upsert replaces by id,
/// scroll enumerates payloads, query scores by cosine similarity.
pub struct InMemoryVectorStore {
    entries: Mutex<Vec<PointRecord>>,
    dimension: Mutex<Option<usize>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            dimension: Mutex::new(None),
        }
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// The dimension recorded by `ensure_collection`, if any.
    pub fn dimension(&self) -> Option<usize> {
        *self.dimension.lock().unwrap()
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorStore for InMemoryVectorStore {
    fn ensure_collection(&self, dimension: usize, _distance: Distance) -> Result<(), StorageError> {
        let mut dim = self.dimension.lock().unwrap();
        if dim.is_none() {
            *dim = Some(dimension);
        }
        Ok(())
    }

    fn upsert(&self, points: &[PointRecord]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap();
        for point in points {
            match entries.iter_mut().find(|e| e.id == point.id) {
                Some(existing) => *existing = point.clone(),
                None => entries.push(point.clone()),
            }
        }
        Ok(())
    }

    fn scroll_all<'a>(
        &'a self,
        _page_size: usize,
    ) -> Box<dyn Iterator<Item = Result<PointPayload, StorageError>> + 'a> {
        let snapshot: Vec<PointPayload> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.payload.clone())
            .collect();
        Box::new(snapshot.into_iter().map(Ok))
    }

    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        category: Option<Category>,
    ) -> Result<Vec<ScoredPoint>, StorageError> {
        let entries = self.entries.lock().unwrap();
        let mut scored: Vec<ScoredPoint> = entries
            .iter()
            .filter(|e| match category {
                Some(cat) => e.payload.category == cat.as_str(),
                None => true,
            })
            .map(|e| ScoredPoint {
                score: cosine_similarity(vector, &e.vector),
                payload: e.payload.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::knowledge::point_id;

    fn point(category: Category, name: &str, vector: Vec<f32>) -> PointRecord {
        PointRecord {
            id: point_id(category, name),
            vector,
            payload: PointPayload {
                category: category.as_str().to_string(),
                name: name.to_string(),
                text: format!("{name} text"),
            },
        }
    }

    #[test]
    fn cosine_similarity_identical_vectors() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.01);
    }

    #[test]
    fn cosine_similarity_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.01);
    }

    #[test]
    fn upsert_by_same_id_replaces_not_duplicates() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[point(Category::Medicine, "Paracetamol", vec![1.0, 0.0])])
            .unwrap();
        store
            .upsert(&[point(Category::Medicine, "  paracetamol  ", vec![0.0, 1.0])])
            .unwrap();

        assert_eq!(store.count(), 1);
    }

    #[test]
    fn query_respects_category_filter() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                point(Category::Medicine, "Aspirin", vec![1.0, 0.0]),
                point(Category::Remedy, "Ginger tea", vec![1.0, 0.0]),
            ])
            .unwrap();

        let hits = store
            .query(&[1.0, 0.0], 10, Some(Category::Medicine))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].payload.category, "medicine");
    }

    #[test]
    fn query_orders_by_descending_score() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                point(Category::Disease, "far", vec![0.0, 1.0]),
                point(Category::Disease, "near", vec![1.0, 0.0]),
                point(Category::Disease, "mid", vec![0.7, 0.7]),
            ])
            .unwrap();

        let hits = store.query(&[1.0, 0.0], 3, None).unwrap();
        assert_eq!(hits[0].payload.name, "near");
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn query_truncates_to_top_k() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                point(Category::Disease, "a", vec![1.0, 0.0]),
                point(Category::Disease, "b", vec![0.9, 0.1]),
                point(Category::Disease, "c", vec![0.8, 0.2]),
            ])
            .unwrap();

        let hits = store.query(&[1.0, 0.0], 2, None).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn ensure_collection_is_idempotent_and_non_destructive() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection(384, Distance::Cosine).unwrap();
        store
            .upsert(&[point(Category::Medicine, "Aspirin", vec![1.0, 0.0])])
            .unwrap();

        store.ensure_collection(384, Distance::Cosine).unwrap();
        assert_eq!(store.count(), 1);
        assert_eq!(store.dimension(), Some(384));
    }

    #[test]
    fn scroll_all_yields_every_payload() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                point(Category::Medicine, "Aspirin", vec![1.0, 0.0]),
                point(Category::LabTest, "Hemoglobin", vec![0.0, 1.0]),
            ])
            .unwrap();

        let payloads: Vec<_> = store
            .scroll_all(1)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(payloads.len(), 2);
    }

    #[test]
    fn empty_store_query_returns_empty() {
        let store = InMemoryVectorStore::new();
        let hits = store.query(&[1.0, 0.0], 3, None).unwrap();
        assert!(hits.is_empty());
    }
}
