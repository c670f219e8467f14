use {
    super::{JsonRpcTransport, TransportError},
    crate::json_rpc::{JsonRpcRequest, JsonRpcResponse},
    async_trait::async_trait,
    std::{
        sync::atomic::{AtomicU64, Ordering},
        time::Duration,
    },
    tracing::debug,
};

/// JSON-RPC over HTTP(S) POST.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rpc-resolver/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl JsonRpcTransport for HttpTransport {
    #[tracing::instrument(skip(self, params), level = "debug")]
    async fn call(
        &self,
        url: &str,
        method: &str,
        params: serde_json::Value,
        timeout: Duration,
    ) -> Result<serde_json::Value, TransportError> {
        let url = reqwest::Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id.into(), method.into(), params);

        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            debug!("endpoint answered {method} with status {status}");
            return Err(TransportError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(classify)?;
        match serde_json::from_slice::<JsonRpcResponse>(&body) {
            Ok(JsonRpcResponse::Result(result)) => Ok(result.result),
            Ok(JsonRpcResponse::Error(error)) => Err(TransportError::Rpc {
                code: error.error.code,
                message: error.error.message.to_string(),
            }),
            Err(e) => Err(TransportError::InvalidResponse(e.to_string())),
        }
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_builder() {
        TransportError::InvalidUrl(error.to_string())
    } else if error.is_decode() || error.is_body() {
        TransportError::InvalidResponse(error.to_string())
    } else {
        TransportError::Connect(error.to_string())
    }
}
