use std::collections::HashSet;

use super::IngestError;
use crate::models::Category;
use crate::pipeline::storage::types::VectorStore;

/// In-memory index of `(category, name)` pairs already present in the
/// store, making ingestion idempotent.
///
/// Built once per ingestion run from a payload-only scroll of the whole
/// collection, then grown as batches land so that later batches see
/// earlier insertions. Discarded when the run ends.
pub struct DedupIndex {
    entries: HashSet<(String, String)>,
}

impl DedupIndex {
    /// Index with no known entries (fresh collection).
    pub fn empty() -> Self {
        Self {
            entries: HashSet::new(),
        }
    }

    /// Drain the store's full scroll and collect normalized identity pairs.
    /// Records missing either payload field are skipped.
    pub fn build(store: &dyn VectorStore, page_size: usize) -> Result<Self, IngestError> {
        let mut entries = HashSet::new();
        for payload in store.scroll_all(page_size) {
            let payload = payload?;
            let category = payload.category.trim().to_lowercase();
            let name = payload.name.trim().to_lowercase();
            if category.is_empty() || name.is_empty() {
                continue;
            }
            entries.insert((category, name));
        }
        tracing::info!(known = entries.len(), "Deduplication index built");
        Ok(Self { entries })
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.entries.contains(&identity_key(category, name))
    }

    /// Record a pair after its point has been upserted.
    pub fn insert(&mut self, category: Category, name: &str) {
        self.entries.insert(identity_key(category, name));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn identity_key(category: Category, name: &str) -> (String, String) {
    (
        category.as_str().to_string(),
        name.trim().to_lowercase(),
    )
}
