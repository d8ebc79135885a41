use super::types::RetrievedSnippet;
use super::RagError;
use crate::models::Category;
use crate::pipeline::storage::types::{EmbeddingModel, VectorStore};

/// Category-aware semantic retrieval over the knowledge collection.
pub struct Retriever<'a, E: EmbeddingModel, V: VectorStore> {
    embedder: &'a E,
    store: &'a V,
}

impl<'a, E: EmbeddingModel, V: VectorStore> Retriever<'a, E, V> {
    pub fn new(embedder: &'a E, store: &'a V) -> Self {
        Self { embedder, store }
    }

    /// Embed the query and return up to `top_k` snippets, best first,
    /// optionally restricted to one category.
    ///
    /// An empty result is a normal outcome (empty collection, or a filter
    /// matching nothing), never an error.
    pub fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        category: Option<Category>,
    ) -> Result<Vec<RetrievedSnippet>, RagError> {
        let vector = self.embedder.embed(query).map_err(RagError::Storage)?;
        let hits = self.store.query(&vector, top_k, category)?;

        Ok(hits
            .into_iter()
            .map(|hit| RetrievedSnippet {
                score: hit.score,
                text: hit.payload.text,
                category: hit.payload.category,
                name: hit.payload.name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::knowledge::point_id;
    use crate::pipeline::storage::embedder::MockEmbedder;
    use crate::pipeline::storage::types::{PointPayload, PointRecord};
    use crate::pipeline::storage::vectordb::InMemoryVectorStore;

    fn seed(store: &InMemoryVectorStore, embedder: &MockEmbedder, category: Category, name: &str) {
        let text = format!("{name} knowledge text");
        store
            .upsert(&[PointRecord {
                id: point_id(category, name),
                vector: embedder.embed(&text).unwrap(),
                payload: PointPayload {
                    category: category.as_str().to_string(),
                    name: name.to_string(),
                    text,
                },
            }])
            .unwrap();
    }

    #[test]
    fn retrieve_returns_snippets_best_first() {
        let embedder = MockEmbedder::with_dimension(16);
        let store = InMemoryVectorStore::new();
        seed(&store, &embedder, Category::Medicine, "Paracetamol");
        seed(&store, &embedder, Category::Medicine, "Ibuprofen");
        seed(&store, &embedder, Category::Remedy, "Ginger tea");

        let retriever = Retriever::new(&embedder, &store);
        let snippets = retriever
            .retrieve("Paracetamol knowledge text", 3, None)
            .unwrap();

        assert_eq!(snippets.len(), 3);
        assert_eq!(snippets[0].name, "Paracetamol");
        for pair in snippets.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn category_filter_excludes_other_categories() {
        let embedder = MockEmbedder::with_dimension(16);
        let store = InMemoryVectorStore::new();
        seed(&store, &embedder, Category::Medicine, "Paracetamol");
        seed(&store, &embedder, Category::Remedy, "Ginger tea");
        seed(&store, &embedder, Category::LabTest, "Hemoglobin");

        let retriever = Retriever::new(&embedder, &store);
        let snippets = retriever
            .retrieve("anything", 10, Some(Category::Medicine))
            .unwrap();

        assert!(!snippets.is_empty());
        assert!(snippets.iter().all(|s| s.category == "medicine"));
    }

    #[test]
    fn empty_store_yields_empty_not_error() {
        let embedder = MockEmbedder::with_dimension(16);
        let store = InMemoryVectorStore::new();

        let retriever = Retriever::new(&embedder, &store);
        let snippets = retriever.retrieve("anything", 3, None).unwrap();
        assert!(snippets.is_empty());
    }

    #[test]
    fn top_k_bounds_result_count() {
        let embedder = MockEmbedder::with_dimension(16);
        let store = InMemoryVectorStore::new();
        for name in ["a", "b", "c", "d", "e"] {
            seed(&store, &embedder, Category::Disease, name);
        }

        let retriever = Retriever::new(&embedder, &store);
        let snippets = retriever.retrieve("anything", 2, None).unwrap();
        assert_eq!(snippets.len(), 2);
    }
}
