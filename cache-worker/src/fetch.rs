//! Requests, responses and the network seam
//!
//! The worker sees every page fetch as a [`Request`] and answers it with a
//! [`Response`], either from its cache or from a [`Network`].

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
}

impl RequestMethod {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Fetch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request URL
    pub url: String,
    /// HTTP method
    pub method: RequestMethod,
    /// Request body (if any)
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Create a new GET request
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: RequestMethod::Get,
            body: None,
        }
    }

    pub fn with_method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    pub fn is_get(&self) -> bool {
        self.method == RequestMethod::Get
    }
}

/// Response type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Same-origin
    Basic,
    /// Cross-origin with CORS
    Cors,
    #[default]
    Default,
    /// Cross-origin without CORS
    Opaque,
}

/// Fetch response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response type
    pub response_type: ResponseType,
    /// URL
    pub url: String,
    /// Status code
    pub status: u16,
    /// Status text
    pub status_text: String,
    /// Response body
    pub body: Option<Vec<u8>>,
}

impl Response {
    /// Create a new response
    pub fn new(status: u16) -> Self {
        Self {
            response_type: ResponseType::Default,
            url: String::new(),
            status,
            status_text: status_text_for(status).to_string(),
            body: None,
        }
    }

    /// Same-origin response for `url` carrying `body`.
    pub fn basic(url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        let mut response = Self::new(status);
        response.response_type = ResponseType::Basic;
        response.url = url.into();
        response.body = Some(body.into());
        response
    }

    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Check if response is OK
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body length in bytes
    pub fn size(&self) -> usize {
        self.body.as_ref().map_or(0, Vec::len)
    }
}

/// Get status text for status code
fn status_text_for(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

/// The request never produced a response.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{url}: {reason}")]
pub struct NetworkError {
    pub url: String,
    pub reason: String,
}

impl NetworkError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Where cache misses go.
pub trait Network {
    fn fetch(&mut self, request: &Request) -> Result<Response, NetworkError>;
}

impl<N: Network + ?Sized> Network for Box<N> {
    fn fetch(&mut self, request: &Request) -> Result<Response, NetworkError> {
        (**self).fetch(request)
    }
}
