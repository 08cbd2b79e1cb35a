use std::path::PathBuf;

use crate::transport::{RequestId, TransportError};

/// All errors produced by the form controllers.
///
/// None of these are fatal: every path that produces one leaves the form
/// interactive.
#[derive(thiserror::Error, Debug)]
pub enum FormError {
    // ── Exchange errors ──────────────────────────────────────────────

    #[error("Network error: {0}")]
    Transport(#[from] TransportError),

    #[error("Backend returned status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Backend rejected the request")]
    Rejected { message: Option<String> },

    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No outstanding request {0}")]
    UnknownRequest(RequestId),

    // ── Configuration errors ─────────────────────────────────────────

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config file not readable: {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FormError {
    /// Message reported by the backend itself, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Whether the request never reached the backend.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
