//! The asset cache worker
//!
//! - **install**: fetch every manifest path, then store them all in the
//!   versioned cache. One failed fetch fails the whole install and nothing is
//!   stored. A successful install skips waiting.
//! - **activate**: delete every cache not named after the current version,
//!   then claim open pages.
//! - **fetch**: cache first; on a miss go to the network and keep a copy of
//!   same-origin `200` responses.

use crate::cache::CacheStorage;
use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::fetch::{Network, Request, Response, ResponseType};
use crate::lifecycle::{LifecycleEvent, LifecycleManager, WorkerState};

pub struct AssetCacheWorker<N> {
    config: WorkerConfig,
    storage: CacheStorage,
    network: N,
    lifecycle: LifecycleManager,
    controlling: bool,
}

impl<N: Network> AssetCacheWorker<N> {
    /// Worker over an empty cache storage.
    pub fn new(config: WorkerConfig, network: N) -> Self {
        Self::with_storage(config, network, CacheStorage::new())
    }

    /// Worker taking over caches left by earlier versions.
    pub fn with_storage(config: WorkerConfig, network: N, storage: CacheStorage) -> Self {
        Self {
            config,
            storage,
            network,
            lifecycle: LifecycleManager::new(),
            controlling: false,
        }
    }

    /// Precache the manifest.
    pub fn install(&mut self) -> Result<(), WorkerError> {
        self.lifecycle.transition(WorkerState::Installing)?;

        let fetched = match self.fetch_manifest() {
            Ok(fetched) => fetched,
            Err(err) => {
                log::warn!("[AssetCache] install failed: {err}");
                self.lifecycle.transition(WorkerState::Redundant)?;
                return Err(err);
            }
        };

        let count = fetched.len();
        let cache = self.storage.open(&self.config.cache_name);
        for (request, response) in fetched {
            cache.put(request, response)?;
        }
        log::info!(
            "[AssetCache] precached {} resources into {} ({} bytes stored)",
            count,
            self.config.cache_name,
            self.storage.usage()
        );

        self.lifecycle.transition(WorkerState::Installed)?;
        self.lifecycle.skip_waiting()
    }

    fn fetch_manifest(&mut self) -> Result<Vec<(Request, Response)>, WorkerError> {
        let mut fetched = Vec::with_capacity(self.config.manifest.len());
        for url in &self.config.manifest {
            let request = Request::new(url.as_str());
            let response = self.network.fetch(&request)?;
            if !response.ok() {
                return Err(WorkerError::PrecacheFailed {
                    url: url.clone(),
                    status: response.status,
                });
            }
            fetched.push((request, response));
        }
        Ok(fetched)
    }

    /// Drop stale caches and take control of open pages.
    ///
    /// Returns the names of the deleted caches.
    pub fn activate(&mut self) -> Result<Vec<String>, WorkerError> {
        if self.lifecycle.state() != WorkerState::Activating {
            self.lifecycle.transition(WorkerState::Activating)?;
        }

        let stale: Vec<String> = self
            .storage
            .keys()
            .into_iter()
            .filter(|name| *name != self.config.cache_name)
            .collect();
        for name in &stale {
            self.storage.delete(name)?;
            log::info!("[AssetCache] deleted stale cache {}", name);
        }

        self.lifecycle.transition(WorkerState::Activated)?;
        self.lifecycle.claim()?;
        self.controlling = true;
        log::info!("[AssetCache] {} active", self.config.cache_name);
        Ok(stale)
    }

    /// Install, then activate.
    pub fn start(&mut self) -> Result<Vec<String>, WorkerError> {
        self.install()?;
        self.activate()
    }

    /// Answer a page fetch.
    ///
    /// Before the worker controls the page every request goes straight to
    /// the network.
    pub fn handle_fetch(&mut self, request: &Request) -> Result<Response, WorkerError> {
        if !self.controlling {
            return Ok(self.network.fetch(request)?);
        }

        if request.is_get() {
            if let Some(cached) = self.storage.match_request(request) {
                log::debug!("[AssetCache] hit {}", request.url);
                return Ok(cached.clone());
            }
        }

        let response = self.network.fetch(request)?;
        if request.is_get()
            && response.status == 200
            && response.response_type == ResponseType::Basic
        {
            self.storage
                .open(&self.config.cache_name)
                .put(request.clone(), response.clone())?;
            log::debug!("[AssetCache] stored {}", request.url);
        }
        Ok(response)
    }

    pub fn state(&self) -> WorkerState {
        self.lifecycle.state()
    }

    pub fn is_controlling(&self) -> bool {
        self.controlling
    }

    pub fn events(&self) -> &[LifecycleEvent] {
        self.lifecycle.pending_events()
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }
}
