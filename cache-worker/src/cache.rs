//! Named response caches
//!
//! A [`CacheStorage`] holds any number of named [`Cache`]s; each maps a
//! request (method and URL) to the response stored for it.

use std::collections::BTreeMap;

use crate::error::CacheError;
use crate::fetch::{Request, Response};

#[derive(Debug, Clone)]
struct CacheEntry {
    request: Request,
    response: Response,
    size: usize,
}

impl CacheEntry {
    fn new(request: Request, response: Response) -> Self {
        let size = response.size();
        Self {
            request,
            response,
            size,
        }
    }
}

/// A single named cache
#[derive(Debug)]
pub struct Cache {
    entries: BTreeMap<String, CacheEntry>,
    total_size: usize,
}

impl Cache {
    fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            total_size: 0,
        }
    }

    /// Stored response for `request`
    pub fn match_request(&self, request: &Request) -> Option<&Response> {
        self.entries
            .get(&Self::make_key(request))
            .map(|e| &e.response)
    }

    /// Store `response` for `request`, replacing any earlier entry.
    pub fn put(&mut self, request: Request, response: Response) -> Result<(), CacheError> {
        if !request.is_get() {
            return Err(CacheError::MethodNotCacheable(request.method));
        }

        let key = Self::make_key(&request);
        let entry = CacheEntry::new(request, response);
        let size = entry.size;

        if let Some(old) = self.entries.insert(key, entry) {
            self.total_size -= old.size;
        }
        self.total_size += size;
        Ok(())
    }

    /// Delete a cached request
    pub fn delete(&mut self, request: &Request) -> bool {
        match self.entries.remove(&Self::make_key(request)) {
            Some(entry) => {
                self.total_size -= entry.size;
                true
            }
            None => false,
        }
    }

    /// Get all cached requests
    pub fn keys(&self) -> Vec<&Request> {
        self.entries.values().map(|e| &e.request).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get total size
    pub fn size(&self) -> usize {
        self.total_size
    }

    fn make_key(request: &Request) -> String {
        format!("{}:{}", request.method.as_str(), request.url)
    }
}

/// Cache storage (manages multiple caches)
#[derive(Debug, Default)]
pub struct CacheStorage {
    caches: BTreeMap<String, Cache>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or create a cache
    pub fn open(&mut self, name: &str) -> &mut Cache {
        self.caches
            .entry(name.to_string())
            .or_insert_with(Cache::new)
    }

    /// Existing cache by name
    pub fn get(&self, name: &str) -> Option<&Cache> {
        self.caches.get(name)
    }

    /// Check if a cache exists
    pub fn has(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    /// Delete a cache
    pub fn delete(&mut self, name: &str) -> Result<(), CacheError> {
        self.caches
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CacheError::NotFound(name.to_string()))
    }

    /// Get all cache names
    pub fn keys(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    /// Match across all caches
    pub fn match_request(&self, request: &Request) -> Option<&Response> {
        self.caches
            .values()
            .find_map(|cache| cache.match_request(request))
    }

    /// Bytes stored over all caches
    pub fn usage(&self) -> usize {
        self.caches.values().map(Cache::size).sum()
    }
}
