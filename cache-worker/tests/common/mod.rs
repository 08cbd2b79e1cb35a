//! Scripted network for the worker integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use taxi_cache_worker::{Network, NetworkError, Request, Response, ResponseType};

/// Answers from a fixed table and records every fetch.
#[derive(Default)]
pub struct ScriptedNetwork {
    routes: BTreeMap<String, Response>,
    unreachable: Vec<String>,
    pub fetched: Vec<String>,
}

impl ScriptedNetwork {
    /// Every default manifest path served as a same-origin 200.
    pub fn serving_site() -> Self {
        let mut network = Self::default();
        for url in taxi_cache_worker::config::DEFAULT_MANIFEST {
            network.serve(url, Response::basic(url, 200, format!("v1 {url}")));
        }
        network
    }

    pub fn serve(&mut self, url: &str, response: Response) {
        self.routes.insert(url.to_string(), response);
    }

    pub fn serve_body(&mut self, url: &str, body: &str) {
        self.serve(url, Response::basic(url, 200, body));
    }

    pub fn serve_cross_origin(&mut self, url: &str) {
        self.serve(url, Response::new(200).with_type(ResponseType::Cors));
    }

    pub fn drop_connection(&mut self, url: &str) {
        self.unreachable.push(url.to_string());
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetched.iter().filter(|u| *u == url).count()
    }
}

impl Network for ScriptedNetwork {
    fn fetch(&mut self, request: &Request) -> Result<Response, NetworkError> {
        self.fetched.push(request.url.clone());
        if self.unreachable.contains(&request.url) {
            return Err(NetworkError::new(request.url.clone(), "connection refused"));
        }
        Ok(self
            .routes
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Response::basic(request.url.clone(), 404, "")))
    }
}

pub fn body(response: &Response) -> String {
    String::from_utf8(response.body.clone().unwrap_or_default()).unwrap()
}
