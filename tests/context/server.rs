use {
    super::TestResult,
    crate::utils::{chain, MockNode},
    rpc_resolver::env::{Config, ServerConfig},
    std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream},
    tokio::{
        sync::broadcast,
        time::{sleep, Duration},
    },
    wiremock::MockServer,
};

/// A resolver whose chain 1 public endpoint is a healthy archive node and
/// chain 10 public endpoint a pruned one.
pub struct ResolverServer {
    pub public_addr: SocketAddr,
    pub archive_node: MockServer,
    pub pruned_node: MockServer,
    shutdown_signal: broadcast::Sender<()>,
    is_shutdown: bool,
}

impl ResolverServer {
    pub async fn start() -> Self {
        let public_port = get_random_port();
        let hostname = Ipv4Addr::LOCALHOST;
        let public_addr = SocketAddr::new(IpAddr::V4(hostname), public_port);

        let archive_node = MockNode::healthy(1, true).start().await;
        let pruned_node = MockNode::healthy(10, false).start().await;

        let (signal, shutdown) = broadcast::channel(1);

        let mut config = Config::default();
        config.server = ServerConfig {
            port: public_port,
            host: hostname.to_string(),
            log_level: "NONE".to_string(),
        };
        config.chains = vec![
            chain(1, &archive_node.uri(), true),
            chain(10, &pruned_node.uri(), false),
        ];

        tokio::spawn(async move {
            rpc_resolver::bootstrap(shutdown, config).await.unwrap();
        });

        if let Err(e) = wait_for_server_to_start(public_port).await {
            panic!("Failed to start server with error: {e:?}")
        }

        Self {
            public_addr,
            archive_node,
            pruned_node,
            shutdown_signal: signal,
            is_shutdown: false,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.public_addr)
    }

    pub async fn shutdown(&mut self) {
        if self.is_shutdown {
            return;
        }
        self.is_shutdown = true;
        let _ = self.shutdown_signal.send(());
        wait_for_server_to_shutdown(self.public_addr.port())
            .await
            .unwrap();
    }
}

// Finds a free port.
fn get_random_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};

    static NEXT_PORT: AtomicU16 = AtomicU16::new(9500);

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

async fn wait_for_server_to_shutdown(port: u16) -> TestResult<()> {
    let poll_fut = async {
        while !is_port_available(port) {
            sleep(Duration::from_millis(10)).await;
        }
    };

    Ok(tokio::time::timeout(Duration::from_secs(3), poll_fut).await?)
}

async fn wait_for_server_to_start(port: u16) -> TestResult<()> {
    let poll_fut = async {
        while is_port_available(port) {
            sleep(Duration::from_millis(10)).await;
        }
    };

    Ok(tokio::time::timeout(Duration::from_secs(5), poll_fut).await?)
}
