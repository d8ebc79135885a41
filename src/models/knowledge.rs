use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

/// One unit of ingestible knowledge: a natural-language chunk plus the
/// metadata that identifies it within the knowledge base.
///
/// Identity is the pair `(category, name)`, compared case-insensitively
/// with surrounding whitespace ignored. The persisted point id is derived
/// from that pair alone, so re-ingesting the same logical item always
/// addresses the same stored point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub category: Category,
    pub name: String,
    pub text: String,
}

impl KnowledgeChunk {
    pub fn new(category: Category, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            text: text.into(),
        }
    }

    /// Normalized identity key used for deduplication.
    pub fn identity(&self) -> (String, String) {
        (
            self.category.as_str().to_string(),
            self.name.trim().to_lowercase(),
        )
    }

    /// Deterministic point id for upsert: UUID v5 over the normalized
    /// `{category}-{name}` key.
    pub fn point_id(&self) -> Uuid {
        point_id(self.category, &self.name)
    }
}

/// UUID v5 (DNS namespace) of the normalized `{category}-{name}` key.
/// Stable across runs, so repeated ingestion upserts the same point.
pub fn point_id(category: Category, name: &str) -> Uuid {
    let key = format!("{}-{}", category.as_str(), name.trim().to_lowercase());
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, key.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_id_is_deterministic() {
        let a = point_id(Category::Medicine, "Paracetamol");
        let b = point_id(Category::Medicine, "Paracetamol");
        assert_eq!(a, b);
    }

    #[test]
    fn point_id_ignores_case_and_whitespace() {
        let a = point_id(Category::Medicine, "Paracetamol");
        let b = point_id(Category::Medicine, "  paracetamol  ");
        assert_eq!(a, b);
    }

    #[test]
    fn point_id_differs_across_categories() {
        let a = point_id(Category::Medicine, "Zinc");
        let b = point_id(Category::Remedy, "Zinc");
        assert_ne!(a, b);
    }

    #[test]
    fn identity_normalizes_name_only() {
        let chunk = KnowledgeChunk::new(Category::LabTest, " Hemoglobin ", "range text");
        assert_eq!(
            chunk.identity(),
            ("lab_test".to_string(), "hemoglobin".to_string())
        );
    }
}
