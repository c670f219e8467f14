use {
    crate::{env::Config, metrics::Metrics, session::Session},
    std::{sync::Arc, time::Instant},
};

pub struct AppState {
    pub config: Config,
    pub session: Arc<Session>,
    pub metrics: Metrics,
    pub uptime: Instant,
}

pub fn new_state(config: Config, session: Arc<Session>, metrics: Metrics) -> AppState {
    AppState {
        config,
        session,
        metrics,
        uptime: Instant::now(),
    }
}
