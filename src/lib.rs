//! Retrieval-augmented medical assistant core.
//!
//! A vector knowledge base of medicines, home remedies, lab-test reference
//! ranges and disease fact sheets, with category-aware semantic retrieval,
//! grounded prompt assembly and generation on top. The HTTP surface,
//! authentication and OCR internals live outside this crate and talk to it
//! through the trait seams in `pipeline`.

pub mod config;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries that embed this crate.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the crate default.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);
}
