use {
    crate::{context::ServerContext, utils::{MockNode, SUBJECT}},
    reqwest::StatusCode,
    serde_json::{json, Value},
    test_context::test_context,
};

async fn get(url: String) -> (StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap_or(Value::Null))
}

#[test_context(ServerContext)]
#[tokio::test]
async fn health_check(ctx: &mut ServerContext) {
    let response = reqwest::get(ctx.server.url("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().starts_with("OK v"));
}

#[test_context(ServerContext)]
#[tokio::test]
async fn chain_table(ctx: &mut ServerContext) {
    let (status, body) = get(ctx.server.url("/v1/chains")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|chain| chain["chainId"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 10]);
}

#[test_context(ServerContext)]
#[tokio::test]
async fn custom_archive_node_takes_over(ctx: &mut ServerContext) {
    let client = reqwest::Client::new();
    let custom = ctx.server.archive_node.uri();

    client
        .put(ctx.server.url("/v1/preference"))
        .json(&json!({"source": "custom"}))
        .send()
        .await
        .unwrap();
    client
        .put(ctx.server.url("/v1/chains/10/custom"))
        .json(&json!({"url": ctx.server.pruned_node.uri()}))
        .send()
        .await
        .unwrap();

    // Chain 10 has no archive node anywhere yet.
    let (status, _) = get(ctx.server.url("/v1/chains/10/endpoint?kind=archive")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // Chain 1: a custom archive node probed healthy serves both read kinds.
    client
        .put(ctx.server.url("/v1/chains/1/custom"))
        .json(&json!({"url": custom}))
        .send()
        .await
        .unwrap();
    let outcome: Value = client
        .post(ctx.server.url("/v1/chains/1/probe"))
        .json(&json!({"url": custom, "subjectAddress": SUBJECT}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["disposition"], "applied");
    assert_eq!(outcome["archiveCapable"], true);

    for kind in ["current", "archive"] {
        let (status, body) =
            get(ctx.server.url(&format!("/v1/chains/1/endpoint?kind={kind}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], custom);
        assert_eq!(body["source"], "custom");
    }
}

#[test_context(ServerContext)]
#[tokio::test]
async fn wrong_chain_custom_falls_back(ctx: &mut ServerContext) {
    let client = reqwest::Client::new();
    // The chain 10 node registered as chain 1's custom endpoint.
    let wrong = ctx.server.pruned_node.uri();

    client
        .put(ctx.server.url("/v1/preference"))
        .json(&json!({"source": "custom"}))
        .send()
        .await
        .unwrap();
    client
        .put(ctx.server.url("/v1/chains/1/custom"))
        .json(&json!({"url": wrong}))
        .send()
        .await
        .unwrap();
    client
        .put(ctx.server.url("/v1/context/subject"))
        .json(&json!({"subjectAddress": SUBJECT}))
        .send()
        .await
        .unwrap();

    let outcome: Value = client
        .post(ctx.server.url("/v1/chains/1/probe"))
        .json(&json!({"url": wrong}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["error"], "chainMismatch");

    let (_, body) = get(ctx.server.url("/v1/chains/1/endpoint")).await;
    assert_eq!(body["url"], ctx.server.archive_node.uri());
    assert_eq!(body["fallback"], true);

    let (_, candidates) = get(ctx.server.url("/v1/chains/1/candidates")).await;
    assert_eq!(candidates["candidates"][1]["isValid"], false);
}

#[test_context(ServerContext)]
#[tokio::test]
async fn custom_endpoint_requiring_auth_falls_back(ctx: &mut ServerContext) {
    let client = reqwest::Client::new();
    let locked = MockNode::failing(401).start().await;

    client
        .put(ctx.server.url("/v1/preference"))
        .json(&json!({"source": "custom"}))
        .send()
        .await
        .unwrap();
    client
        .put(ctx.server.url("/v1/chains/1/custom"))
        .json(&json!({"url": locked.uri()}))
        .send()
        .await
        .unwrap();

    let outcome: Value = client
        .post(ctx.server.url("/v1/chains/1/probe"))
        .json(&json!({"url": locked.uri(), "subjectAddress": SUBJECT}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["disposition"], "applied");
    assert_eq!(outcome["reachable"], true);
    assert_eq!(outcome["archiveCapable"], false);

    for kind in ["current", "archive"] {
        let (status, body) =
            get(ctx.server.url(&format!("/v1/chains/1/endpoint?kind={kind}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], ctx.server.archive_node.uri());
        assert_eq!(body["source"], "public");
        assert_eq!(body["fallback"], true);
    }
}

#[test_context(ServerContext)]
#[tokio::test]
async fn unknown_chain(ctx: &mut ServerContext) {
    let (status, body) = get(ctx.server.url("/v1/chains/56/candidates")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("56"));
}
