pub mod types;
pub mod retrieval;
pub mod prompt;
pub mod generator;
pub mod orchestrator;

use thiserror::Error;

use crate::pipeline::storage::StorageError;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Generation request failed: {0}")]
    Generation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
