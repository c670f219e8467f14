use {
    crate::{
        env::{Config, StorageBackend, StorageConfig},
        error::{ResolverError, ResolverResult},
        metrics::Metrics,
        probe::HealthProbe,
        session::{PreferenceStore, Session, StoredPreference},
        storage::{file::FileStorage, memory::MemoryStorage, redis::Redis, KeyValueStorage},
        transport::HttpTransport,
    },
    anyhow::Context,
    axum::{
        http,
        response::Response,
        routing::{get, post, put},
        Router,
    },
    std::{net::SocketAddr, sync::Arc, time::Duration},
    tokio::{net::TcpListener, sync::broadcast},
    tower::ServiceBuilder,
    tower_http::{
        cors::{Any, CorsLayer},
        trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    },
    tracing::{info, Level, Span},
};

pub mod chain_config;
pub mod env;
pub mod error;
mod handlers;
pub mod json_rpc;
pub mod metrics;
pub mod policy;
pub mod probe;
pub mod registry;
pub mod session;
mod state;
pub mod storage;
#[cfg(test)]
mod test_helpers;
pub mod transport;
pub mod utils;

pub async fn bootstrap(mut shutdown: broadcast::Receiver<()>, config: Config) -> ResolverResult<()> {
    let storage = init_storage(&config.storage)?;
    let store = PreferenceStore::new(storage, &config.storage);
    let probe = HealthProbe::new(Arc::new(HttpTransport::new()?), &config.probe);
    let session = Arc::new(Session::load(config.chains.clone(), probe, store).await);

    let port = config.server.port;
    let host = config.server.host.clone();
    let state = Arc::new(state::new_state(config, session.clone(), Metrics::new()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            http::header::CONTENT_TYPE,
            http::header::USER_AGENT,
            http::header::REFERER,
            http::header::ORIGIN,
            http::header::ACCESS_CONTROL_REQUEST_METHOD,
            http::header::ACCESS_CONTROL_REQUEST_HEADERS,
        ]);

    let global_middleware = ServiceBuilder::new().layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().include_headers(true))
            .on_request(DefaultOnRequest::new().level(Level::DEBUG))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .include_headers(true),
            ),
    );

    let api_state = state.clone();
    let api_metrics = ServiceBuilder::new().layer(TraceLayer::new_for_http().on_response(
        move |response: &Response, latency: Duration, _span: &Span| {
            api_state
                .metrics
                .add_http_call(response.status().into(), "v1");

            api_state.metrics.add_http_latency(
                response.status().into(),
                "v1",
                latency.as_secs_f64(),
            )
        },
    ));

    let app = Router::new()
        .route("/v1/chains", get(handlers::chains::handler))
        .route(
            "/v1/chains/{chain_id}/candidates",
            get(handlers::candidates::handler),
        )
        .route(
            "/v1/chains/{chain_id}/endpoint",
            get(handlers::endpoint::handler),
        )
        .route(
            "/v1/chains/{chain_id}/custom",
            put(handlers::custom::set_handler).delete(handlers::custom::clear_handler),
        )
        .route("/v1/chains/{chain_id}/probe", post(handlers::probe::handler))
        .route(
            "/v1/preference",
            get(handlers::preference::get_handler).put(handlers::preference::set_handler),
        )
        .route("/v1/context", get(handlers::context::get_handler))
        .route(
            "/v1/context/chain",
            put(handlers::context::switch_chain_handler),
        )
        .route(
            "/v1/context/subject",
            put(handlers::context::subject_handler),
        )
        .route(
            "/v1/wallet",
            put(handlers::wallet::connect_handler).delete(handlers::wallet::disconnect_handler),
        )
        .route_layer(api_metrics)
        .route("/health", get(handlers::health::handler))
        .route("/metrics", get(handlers::metrics::handler))
        .layer(cors)
        .layer(global_middleware)
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| ResolverError::InvalidConfiguration(format!("invalid socket address: {e}")))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("v{}", env!("CARGO_PKG_VERSION"));
    info!("Running RPC resolver on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            info!("Shutdown signal received");
        })
        .await?;

    session.shutdown().await;
    Ok(())
}

/// Redis when an address is configured, otherwise files under `data_dir`,
/// otherwise process memory.
fn init_storage(
    config: &StorageConfig,
) -> ResolverResult<Arc<dyn KeyValueStorage<StoredPreference>>> {
    Ok(match config.backend() {
        StorageBackend::Redis(addr) => {
            info!("Storing preferences in redis at {}", addr.write);
            Arc::new(Redis::new(
                &addr,
                config.redis_max_connections,
                &config.redis_key_prefix,
            )?)
        }
        StorageBackend::File(dir) => {
            info!("Storing preferences in {}", dir.display());
            Arc::new(FileStorage::new(dir))
        }
        StorageBackend::Memory => {
            info!("No durable storage configured, preferences last for this process only");
            Arc::new(MemoryStorage::new())
        }
    })
}
