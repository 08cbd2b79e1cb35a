//! Network seam between the controllers and the backend
//!
//! Controllers hand an [`ApiRequest`] to a [`Transport`] and return to the
//! event loop. When the response (or a transport failure) arrives, the
//! embedder passes it back to the owning controller's `on_response` together
//! with the request's [`RequestId`].

use core::sync::atomic::{AtomicU64, Ordering};
use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::FormError;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Create a new unique ID
    pub fn new() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Get raw value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RequestId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Backend endpoint a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    SuggestCities,
    CalculateDistance,
    SubmitRequest,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::SuggestCities => "suggest-cities",
            Endpoint::CalculateDistance => "calculate-distance",
            Endpoint::SubmitRequest => "submit-request",
        }
    }
}

/// A JSON `POST` addressed to one of the backend endpoints.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub id: RequestId,
    pub endpoint: Endpoint,
    /// Request path (e.g., "/api/suggest-cities").
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    /// Serialize `payload` as the JSON body of a new request.
    pub fn post_json<P: Serialize>(
        endpoint: Endpoint,
        path: &str,
        payload: &P,
    ) -> Result<Self, FormError> {
        let body = serde_json::to_vec(payload)?;
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Content-Length".to_string(), body.len().to_string());

        Ok(Self {
            id: RequestId::new(),
            endpoint,
            path: path.to_string(),
            headers,
            body,
        })
    }

    /// Decode the JSON body, mostly useful to backends and tests.
    pub fn json<'a, D: serde::Deserialize<'a>>(&'a self) -> Result<D, FormError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response carrying `value` serialized as JSON.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            body: value.to_string().into_bytes(),
        }
    }

    /// Check if response is OK
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// What the embedder hands back for a request.
pub type Delivery = Result<HttpResponse, TransportError>;

/// Outbound half of the network.
pub trait Transport {
    /// Start sending `request`. Completion is reported asynchronously.
    fn send(&mut self, request: ApiRequest) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, request: ApiRequest) -> Result<(), TransportError> {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn post_json_sets_headers() {
        let req = ApiRequest::post_json(
            Endpoint::SuggestCities,
            "/api/suggest-cities",
            &serde_json::json!({ "query": "Мос" }),
        )
        .unwrap();

        assert_eq!(req.path, "/api/suggest-cities");
        assert_eq!(
            req.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            req.headers.get("Content-Length"),
            Some(&req.body.len().to_string())
        );
        let body: serde_json::Value = req.json().unwrap();
        assert_eq!(body["query"], "Мос");
    }

    #[test]
    fn response_ok_range() {
        assert!(HttpResponse::new(200, "").ok());
        assert!(HttpResponse::new(204, "").ok());
        assert!(!HttpResponse::new(302, "").ok());
        assert!(!HttpResponse::new(400, "").ok());
        assert!(!HttpResponse::new(500, "").ok());
    }
}
