use {
    crate::{
        chain_config::ChainId,
        policy::{EndpointConfig, ReadKind, ResolutionError},
        probe::{ProbeDisposition, ProbeResult},
    },
    metrics::{counter, describe_counter, describe_histogram, histogram, Unit},
    metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle},
    std::{fmt, sync::OnceLock},
    tracing::warn,
};

/// Process-wide Prometheus recorder. Every `Metrics` shares it.
fn recorder_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if let Err(e) = metrics::set_global_recorder(recorder) {
                warn!("metrics recorder already installed, /metrics stays empty: {e}");
            }
            describe();
            handle
        })
        .clone()
}

fn describe() {
    describe_counter!("probe_counter", "The number of endpoint health checks run");
    describe_histogram!(
        "probe_latency_tracker",
        Unit::Seconds,
        "The endpoint health check latency"
    );
    describe_counter!("resolution_counter", "The number of endpoint resolutions served");
    describe_counter!("http_call_counter", "The number of http calls served");
    describe_histogram!("http_latency_tracker", Unit::Seconds, "The http call latency");
}

#[derive(Clone)]
pub struct Metrics {
    handle: PrometheusHandle,
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics").finish()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            handle: recorder_handle(),
        }
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn add_probe(&self, result: &ProbeResult, disposition: ProbeDisposition) {
        let outcome = result
            .error
            .map_or_else(|| "ok".to_string(), |kind| kind.to_string());
        counter!(
            "probe_counter",
            "chain.id" => result.chain_id.to_string(),
            "outcome" => outcome,
            "disposition" => disposition.to_string()
        )
        .increment(1);
        histogram!("probe_latency_tracker", "chain.id" => result.chain_id.to_string())
            .record(result.latency_ms as f64 / 1_000.0);
    }

    /// `fallback` when something other than the preferred source answered,
    /// `unavailable` when nothing did.
    pub fn add_resolution(
        &self,
        chain_id: ChainId,
        kind: ReadKind,
        resolved: &Result<EndpointConfig, ResolutionError>,
    ) {
        let outcome = match resolved {
            Ok(config) if config.fallback => "fallback",
            Ok(_) => "preferred",
            Err(_) => "unavailable",
        };
        counter!(
            "resolution_counter",
            "chain.id" => chain_id.to_string(),
            "kind" => kind.to_string(),
            "outcome" => outcome
        )
        .increment(1);
    }

    pub fn add_http_call(&self, code: u16, route: &str) {
        counter!(
            "http_call_counter",
            "code" => code.to_string(),
            "route" => route.to_owned()
        )
        .increment(1);
    }

    pub fn add_http_latency(&self, code: u16, route: &str, latency: f64) {
        histogram!(
            "http_latency_tracker",
            "code" => code.to_string(),
            "route" => route.to_owned()
        )
        .record(latency);
    }
}
