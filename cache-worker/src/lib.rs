//! Taxi site asset cache worker
//!
//! Keeps a versioned cache of the site's pages and static assets so they
//! stay reachable offline. The embedder forwards the worker's install,
//! activate and fetch events; misses go to a [`Network`].
//!
//! - `worker`: The install / activate / fetch policy
//! - `cache`: Named response caches
//! - `lifecycle`: Worker state machine and lifecycle events
//! - `fetch`: Request/response model and the network seam
//! - `config`: Cache name and precache manifest

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod worker;

pub use cache::{Cache, CacheStorage};
pub use config::WorkerConfig;
pub use error::{CacheError, WorkerError};
pub use fetch::{Network, NetworkError, Request, RequestMethod, Response, ResponseType};
pub use lifecycle::{LifecycleEvent, WorkerState};
pub use worker::AssetCacheWorker;
