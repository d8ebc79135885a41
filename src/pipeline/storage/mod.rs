pub mod types;
pub mod embedder;
pub mod qdrant;
pub mod vectordb;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Vector store error: {0}")]
    VectorDb(String),

    #[error("Vector store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Embedding model initialization: {0}")]
    ModelInit(String),

    #[error("Tokenization error: {0}")]
    Tokenization(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),
}
