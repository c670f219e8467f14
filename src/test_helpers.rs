use {
    crate::{
        chain_config::ChainConfig,
        env::{Config, ProbeConfig, ServerConfig},
    },
    std::{
        net::{Ipv4Addr, SocketAddrV4, TcpStream},
        sync::atomic::{AtomicU16, Ordering},
        time::Duration,
    },
    serde_json::{json, Value},
    tokio::sync::broadcast,
    url::Url,
    wiremock::{matchers::method, Mock, MockServer, Request, Respond, ResponseTemplate},
};

#[derive(Default)]
pub struct Params {
    /// Replaces the built-in chain table.
    pub chains: Option<Vec<ChainConfig>>,
    pub probe: Option<ProbeConfig>,
}

pub async fn spawn_resolver() -> Url {
    spawn_resolver_with_params(Default::default()).await
}

/// Starts a resolver on a free local port. It runs until the test's
/// runtime goes away.
pub async fn spawn_resolver_with_params(params: Params) -> Url {
    let port = get_random_port();
    let mut config = Config::default();
    config.server = ServerConfig {
        port,
        host: Ipv4Addr::LOCALHOST.to_string(),
        log_level: "NONE".to_string(),
    };
    if let Some(chains) = params.chains {
        config.chains = chains;
    }
    if let Some(probe) = params.probe {
        config.probe = probe;
    }

    let (signal, shutdown) = broadcast::channel(1);
    tokio::spawn(async move {
        let _signal = signal;
        crate::bootstrap(shutdown, config).await.unwrap();
    });

    wait_for_server_to_start(port).await;

    format!("http://{}:{port}", Ipv4Addr::LOCALHOST)
        .parse()
        .unwrap()
}

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

fn get_random_port() -> u16 {
    static NEXT_PORT: AtomicU16 = AtomicU16::new(9000);
    loop {
        let port = NEXT_PORT.fetch_add(1, Ordering::SeqCst);
        if is_port_available(port) {
            return port;
        }
    }
}

fn is_port_available(port: u16) -> bool {
    TcpStream::connect(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port)).is_err()
}

async fn wait_for_server_to_start(port: u16) {
    let poll_fut = async {
        while is_port_available(port) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };

    tokio::time::timeout(Duration::from_secs(5), poll_fut)
        .await
        .unwrap()
}

/// JSON-RPC node double for wiremock. Answers the calls a probe makes.
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
