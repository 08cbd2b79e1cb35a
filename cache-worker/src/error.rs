use std::path::PathBuf;

use crate::fetch::{NetworkError, RequestMethod};
use crate::lifecycle::WorkerState;

/// Errors raised by the cache storage.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache not found: {0}")]
    NotFound(String),

    #[error("Only GET requests can be cached, got {}", .0.as_str())]
    MethodNotCacheable(RequestMethod),
}

/// All errors produced by the asset cache worker.
#[derive(thiserror::Error, Debug)]
pub enum WorkerError {
    // ── Lifecycle errors ─────────────────────────────────────────────

    #[error("Precache failed for {url}: status {status}")]
    PrecacheFailed { url: String, status: u16 },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: WorkerState, to: WorkerState },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    // ── Configuration errors ─────────────────────────────────────────

    #[error("Invalid manifest: {0}")]
    ManifestInvalid(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config file not readable: {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
}
