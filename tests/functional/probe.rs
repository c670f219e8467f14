use {
    crate::utils::{chain, rpc_error, MockNode, SUBJECT},
    rpc_resolver::{
        env::ProbeConfig,
        probe::{HealthProbe, ProbeErrorKind},
        transport::HttpTransport,
    },
    serde_json::json,
    std::{sync::Arc, time::Duration},
    wiremock::{
        matchers::{body_partial_json, method},
        Mock,
        MockServer,
        ResponseTemplate,
    },
};

fn health_probe(timeout_ms: u64) -> HealthProbe {
    HealthProbe::new(
        Arc::new(HttpTransport::new().unwrap()),
        &ProbeConfig {
            timeout_ms,
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn archive_node() {
    let node = MockNode::healthy(1, true).start().await;
    let result = health_probe(5_000)
        .check_endpoint(&node.uri(), &chain(1, &node.uri(), false), SUBJECT)
        .await;

    assert!(result.is_usable());
    assert!(result.archive_capable);
    assert_eq!(result.error, None);
    assert_eq!(node.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn pruned_node() {
    let node = MockNode::healthy(1, false).start().await;
    let result = health_probe(5_000)
        .check_endpoint(&node.uri(), &chain(1, &node.uri(), false), SUBJECT)
        .await;

    assert!(result.is_usable());
    assert!(!result.archive_capable);
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn node_on_another_chain() {
    let node = MockNode::healthy(137, true).start().await;
    let result = health_probe(5_000)
        .check_endpoint(&node.uri(), &chain(1, &node.uri(), false), SUBJECT)
        .await;

    assert!(result.reachable);
    assert!(!result.chain_id_matches);
    assert_eq!(result.error, Some(ProbeErrorKind::ChainMismatch));
    assert_eq!(node.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn endpoint_requiring_auth() {
    let node = MockNode::failing(401).start().await;

    let result = health_probe(5_000)
        .check_endpoint(&node.uri(), &chain(1, &node.uri(), false), SUBJECT)
        .await;

    assert!(result.reachable);
    assert!(!result.is_usable());
    assert!(!result.archive_capable);
    assert_eq!(result.error, Some(ProbeErrorKind::ChainMismatch));
}

#[tokio::test]
async fn node_without_state() {
    let node = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_chainId"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"})),
        )
        .mount(&node)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_getBalance"})))
        .respond_with(rpc_error(json!(2), -32601, "the method eth_getBalance does not exist"))
        .mount(&node)
        .await;

    let result = health_probe(5_000)
        .check_endpoint(&node.uri(), &chain(1, &node.uri(), false), SUBJECT)
        .await;

    assert!(result.reachable);
    assert!(result.chain_id_matches);
    assert_eq!(result.error, Some(ProbeErrorKind::StateQueryFailed));
}

#[tokio::test]
async fn nothing_listening() {
    // Nothing serves tcpmux on loopback.
    let url = "http://127.0.0.1:1".to_string();

    let result = health_probe(5_000)
        .check_endpoint(&url, &chain(1, &url, false), SUBJECT)
        .await;

    assert!(!result.reachable);
    assert_eq!(result.error, Some(ProbeErrorKind::Unreachable));
}

#[tokio::test]
async fn slow_node_is_cut_off() {
    let node = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&node)
        .await;

    let started = std::time::Instant::now();
    let result = health_probe(300)
        .check_endpoint(&node.uri(), &chain(1, &node.uri(), false), SUBJECT)
        .await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(result.error, Some(ProbeErrorKind::Unreachable));
}
