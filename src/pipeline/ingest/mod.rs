pub mod dedup;
pub mod sources;
pub mod runner;

use thiserror::Error;

use crate::pipeline::storage::StorageError;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
