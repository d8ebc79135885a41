use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{Distance, PointPayload, PointRecord, ScoredPoint, VectorStore};
use super::StorageError;
use crate::config;
use crate::models::Category;

/// Request timeout for collection and point operations.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for one named Qdrant collection over its REST API.
///
/// Collection setup is strictly check-then-create: an existing collection
/// is never recreated, so a second ingestion run cannot destroy stored
/// vectors.
pub struct QdrantStore {
    base_url: String,
    collection: String,
    batch_size: usize,
    client: reqwest::blocking::Client,
}

impl QdrantStore {
    pub fn new(base_url: &str, collection: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            batch_size: config::upsert_batch_size(),
            client,
        }
    }

    /// Client for the configured local instance and collection.
    pub fn from_config() -> Self {
        Self::new(&config::qdrant_url(), &config::collection_name())
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    /// Probe collection existence by HTTP status: 200 means present,
    /// 404 means absent, anything else is an error.
    pub fn collection_exists(&self) -> Result<bool, StorageError> {
        let resp = self.client.get(self.collection_url()).send()?;
        match resp.status() {
            reqwest::StatusCode::OK => Ok(true),
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            status => Err(StorageError::VectorDb(format!(
                "Collection probe returned {status}"
            ))),
        }
    }

    fn create_collection(&self, dimension: usize, distance: Distance) -> Result<(), StorageError> {
        let body = CreateCollectionRequest {
            vectors: VectorParams {
                size: dimension,
                distance: distance.as_str(),
            },
        };
        let resp = self.client.put(self.collection_url()).json(&body).send()?;
        check_status("create collection", &self.collection, resp)?;
        tracing::info!(
            collection = %self.collection,
            dimension,
            "Created vector collection"
        );
        Ok(())
    }

    fn fetch_scroll_page(
        &self,
        page_size: usize,
        offset: Option<&Value>,
    ) -> Result<(Vec<PointPayload>, Option<Value>), StorageError> {
        let body = ScrollRequest {
            limit: page_size,
            with_payload: true,
            with_vector: false,
            offset,
        };
        let resp = self
            .client
            .post(format!("{}/points/scroll", self.collection_url()))
            .json(&body)
            .send()?;
        let resp = check_status("scroll", &self.collection, resp)?;
        let parsed: ScrollResponse = resp.json()?;
        let payloads = parsed
            .result
            .points
            .into_iter()
            .map(|p| p.payload)
            .collect();
        Ok((payloads, parsed.result.next_page_offset))
    }
}

impl VectorStore for QdrantStore {
    fn ensure_collection(&self, dimension: usize, distance: Distance) -> Result<(), StorageError> {
        if self.collection_exists()? {
            tracing::debug!(collection = %self.collection, "Collection already exists");
            return Ok(());
        }
        self.create_collection(dimension, distance)
    }

    fn upsert(&self, points: &[PointRecord]) -> Result<(), StorageError> {
        for batch in points.chunks(self.batch_size) {
            let body = UpsertRequest {
                points: batch
                    .iter()
                    .map(|p| UpsertPoint {
                        id: p.id.to_string(),
                        vector: &p.vector,
                        payload: &p.payload,
                    })
                    .collect(),
            };
            let resp = self
                .client
                .put(format!("{}/points?wait=true", self.collection_url()))
                .json(&body)
                .send()?;
            check_status("upsert", &self.collection, resp)?;
            tracing::debug!(count = batch.len(), "Upserted point batch");
        }
        Ok(())
    }

    fn scroll_all<'a>(
        &'a self,
        page_size: usize,
    ) -> Box<dyn Iterator<Item = Result<PointPayload, StorageError>> + 'a> {
        Box::new(ScrollIter {
            store: self,
            page_size,
            offset: None,
            buffer: VecDeque::new(),
            exhausted: false,
        })
    }

    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        category: Option<Category>,
    ) -> Result<Vec<ScoredPoint>, StorageError> {
        let filter = category.map(|cat| Filter {
            must: vec![FieldCondition {
                key: "category",
                r#match: MatchValue {
                    value: cat.as_str(),
                },
            }],
        });
        let body = QueryRequest {
            query: vector,
            limit: top_k,
            with_payload: true,
            filter,
        };
        let resp = self
            .client
            .post(format!("{}/points/query", self.collection_url()))
            .json(&body)
            .send()?;
        let resp = check_status("query", &self.collection, resp)?;
        let parsed: QueryResponse = resp.json()?;
        Ok(parsed
            .result
            .points
            .into_iter()
            .map(|p| ScoredPoint {
                score: p.score,
                payload: p.payload,
            })
            .collect())
    }
}

/// Paginates a full-collection scroll, one payload at a time.
struct ScrollIter<'a> {
    store: &'a QdrantStore,
    page_size: usize,
    offset: Option<Value>,
    buffer: VecDeque<PointPayload>,
    exhausted: bool,
}

impl Iterator for ScrollIter<'_> {
    type Item = Result<PointPayload, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(payload) = self.buffer.pop_front() {
                return Some(Ok(payload));
            }
            if self.exhausted {
                return None;
            }
            match self
                .store
                .fetch_scroll_page(self.page_size, self.offset.as_ref())
            {
                Ok((payloads, next_offset)) => {
                    self.buffer.extend(payloads);
                    match next_offset {
                        Some(offset) => self.offset = Some(offset),
                        None => self.exhausted = true,
                    }
                    if self.buffer.is_empty() && self.exhausted {
                        return None;
                    }
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

fn check_status(
    operation: &str,
    collection: &str,
    resp: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, StorageError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let detail = resp.text().unwrap_or_default();
    Err(StorageError::VectorDb(format!(
        "{operation} on '{collection}' returned {status}: {detail}"
    )))
}

// ── Wire types ─────────────────────────────────────────────

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    points: Vec<UpsertPoint<'a>>,
}

#[derive(Serialize)]
struct UpsertPoint<'a> {
    id: String,
    vector: &'a [f32],
    payload: &'a PointPayload,
}

#[derive(Serialize)]
struct ScrollRequest<'a> {
    limit: usize,
    with_payload: bool,
    with_vector: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<&'a Value>,
}

#[derive(Deserialize)]
struct ScrollResponse {
    result: ScrollResult,
}

#[derive(Deserialize)]
struct ScrollResult {
    points: Vec<ScrolledPoint>,
    #[serde(default)]
    next_page_offset: Option<Value>,
}

#[derive(Deserialize)]
struct ScrolledPoint {
    #[serde(default)]
    payload: PointPayload,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a [f32],
    limit: usize,
    with_payload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
}

#[derive(Serialize)]
struct Filter {
    must: Vec<FieldCondition>,
}

#[derive(Serialize)]
struct FieldCondition {
    key: &'static str,
    r#match: MatchValue,
}

#[derive(Serialize)]
struct MatchValue {
    value: &'static str,
}

#[derive(Deserialize)]
struct QueryResponse {
    result: QueryResult,
}

#[derive(Deserialize)]
struct QueryResult {
    points: Vec<ScoredPointWire>,
}

#[derive(Deserialize)]
struct ScoredPointWire {
    score: f32,
    #[serde(default)]
    payload: PointPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_filter_serializes_to_exact_match() {
        let filter = Filter {
            must: vec![FieldCondition {
                key: "category",
                r#match: MatchValue { value: "medicine" },
            }],
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "must": [{"key": "category", "match": {"value": "medicine"}}]
            })
        );
    }

    #[test]
    fn scroll_request_omits_absent_offset() {
        let body = ScrollRequest {
            limit: 100,
            with_payload: true,
            with_vector: false,
            offset: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("offset").is_none());
    }

    #[test]
    fn scroll_response_defaults_missing_payload_fields() {
        let raw = r#"{
            "result": {
                "points": [{"id": 1, "payload": {"name": "Hemoglobin"}}],
                "next_page_offset": null
            }
        }"#;
        let parsed: ScrollResponse = serde_json::from_str(raw).unwrap();
        let payload = &parsed.result.points[0].payload;
        assert_eq!(payload.name, "Hemoglobin");
        assert!(payload.category.is_empty());
        assert!(payload.text.is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let store = QdrantStore::new("http://localhost:6333/", "kb");
        assert_eq!(store.collection_url(), "http://localhost:6333/collections/kb");
    }
}
