use {
    rpc_resolver::chain_config::ChainConfig,
    serde_json::{json, Value},
    wiremock::{matchers::method, Mock, MockServer, Request, Respond, ResponseTemplate},
};

pub const SUBJECT: &str = "0x00000000219ab540356cbb839cbe05303d7705fa";

pub fn chain(chain_id: u64, public_rpc_url: &str, public_rpc_archive: bool) -> ChainConfig {
    ChainConfig {
        chain_id,
        name: format!("Test chain {chain_id}"),
        block_time_ms: 12_000,
        explorer_url: "https://explorer.example".to_string(),
        public_rpc_url: public_rpc_url.to_string(),
        public_rpc_archive,
    }
}

/// Stands in for an Ethereum node behind a wiremock server.
pub struct MockNode {
    pub chain_id: u64,
    pub archive: bool,
    /// Answer every request with this HTTP status instead.
    pub status: Option<u16>,
}

impl MockNode {
    pub fn healthy(chain_id: u64, archive: bool) -> Self {
        Self {
            chain_id,
            archive,
            status: None,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            chain_id: 0,
            archive: false,
            status: Some(status),
        }
    }

    pub async fn start(self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(self)
            .mount(&server)
            .await;
        server
    }
}

impl Respond for MockNode {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if let Some(status) = self.status {
            return ResponseTemplate::new(status);
        }
        let request: Value = request.body_json().unwrap();
        let id = request["id"].clone();
        let result = match request["method"].as_str() {
            Some("eth_chainId") => json!(format!("0x{:x}", self.chain_id)),
            Some("eth_blockNumber") => json!("0x1000000"),
            Some("eth_getBalance") if request["params"][1] == "latest" || self.archive => {
                json!("0xde0b6b3a7640000")
            }
            Some("eth_getBalance") => {
                return rpc_error(id, -32000, "missing trie node");
            }
            _ => return rpc_error(id, -32601, "method not found"),
        };
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": result,
        }))
    }
}

pub fn rpc_error(id: Value, code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message},
    }))
}
