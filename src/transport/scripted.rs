//! In-process transport answering from a closure, for unit tests.

use {
    super::{JsonRpcTransport, TransportError},
    async_trait::async_trait,
    serde_json::Value,
    std::{
        sync::{Arc, Mutex},
        time::Duration,
    },
};

type Handler = dyn Fn(&str, &str, &Value) -> Result<Value, TransportError> + Send + Sync;

pub struct ScriptedTransport {
    handler: Box<Handler>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    pub fn new(
        handler: impl Fn(&str, &str, &Value) -> Result<Value, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            delay: None,
            calls: Default::default(),
        }
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }

    /// A node on `chain_id` with full history and a fixed head block.
    pub fn healthy(chain_id: u64, archive: bool) -> Self {
        Self::new(move |_url, method, params| match method {
            "eth_chainId" => Ok(Value::from(format!("0x{chain_id:x}"))),
            "eth_blockNumber" => Ok(Value::from("0x1000000")),
            "eth_getBalance" => {
                if params[1] == "latest" || archive {
                    Ok(Value::from("0xde0b6b3a7640000"))
                } else {
                    Err(TransportError::Rpc {
                        code: -32000,
                        message: "missing trie node".to_string(),
                    })
                }
            }
            other => Err(TransportError::Rpc {
                code: -32601,
                message: format!("method {other} not found"),
            }),
        })
    }
}

#[async_trait]
impl JsonRpcTransport for ScriptedTransport {
    async fn call(
        &self,
        url: &str,
        method: &str,
        params: Value,
        _timeout: Duration,
    ) -> Result<Value, TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(method.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(url, method, &params)
    }
}
