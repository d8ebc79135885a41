use std::env;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "medkb";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the vector collection holding the medical knowledge base.
pub const DEFAULT_COLLECTION: &str = "medical_kb";

/// Snippets returned by retrieval unless the caller asks otherwise.
pub const DEFAULT_TOP_K: usize = 3;

/// Points per upsert request unless `MEDKB_EMBED_BATCH` overrides it.
pub const DEFAULT_UPSERT_BATCH: usize = 256;

pub fn collection_name() -> String {
    env::var("MEDKB_COLLECTION").unwrap_or_else(|_| DEFAULT_COLLECTION.to_string())
}

pub fn qdrant_url() -> String {
    env::var("MEDKB_QDRANT_URL").unwrap_or_else(|_| "http://localhost:6333".to_string())
}

pub fn ollama_url() -> String {
    env::var("MEDKB_OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string())
}

/// Generation model tag on the local Ollama instance.
pub fn generation_model() -> String {
    env::var("MEDKB_GENERATION_MODEL").unwrap_or_else(|_| "phi3:mini".to_string())
}

pub fn upsert_batch_size() -> usize {
    env::var("MEDKB_EMBED_BATCH")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_UPSERT_BATCH)
}

/// Root of the knowledge source files (`MEDKB_DATA_DIR`, default `./data`)
pub fn data_dir() -> PathBuf {
    env::var("MEDKB_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

pub fn medicine_file() -> PathBuf {
    data_dir().join("medicines.csv")
}

pub fn remedy_file() -> PathBuf {
    data_dir().join("home_remedies.csv")
}

pub fn lab_file() -> PathBuf {
    data_dir().join("lab_report_master.csv")
}

pub fn disease_dir() -> PathBuf {
    data_dir().join("diseases")
}

/// Get the application data directory
/// ~/medkb/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("medkb")
}

/// Get the models directory (for ONNX embeddings, etc.)
pub fn models_dir() -> PathBuf {
    app_data_dir().join("models")
}

/// Get the embedding model directory (all-MiniLM-L6-v2)
pub fn embedding_model_dir() -> PathBuf {
    models_dir().join("all-MiniLM-L6-v2")
}

pub fn default_log_filter() -> &'static str {
    "info,medkb=debug"
}
