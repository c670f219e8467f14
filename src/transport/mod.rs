use {async_trait::async_trait, std::time::Duration};

mod http;
#[cfg(test)]
pub(crate) mod scripted;

pub use http::HttpTransport;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("endpoint answered with HTTP status {0}")]
    HttpStatus(u16),

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid JSON-RPC response: {0}")]
    InvalidResponse(String),

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// The endpoint never produced a response: nothing is listening, the
    /// connection was refused or the deadline passed first.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::Connect(_) | Self::InvalidUrl(_)
        )
    }
}

/// Sends one JSON-RPC call to an arbitrary endpoint.
#[async_trait]
pub trait JsonRpcTransport: Send + Sync + 'static {
    async fn call(
        &self,
        url: &str,
        method: &str,
        params: serde_json::Value,
        timeout: Duration,
    ) -> Result<serde_json::Value, TransportError>;
}
