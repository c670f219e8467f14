use {
    crate::state::AppState,
    axum::{extract::State, http::StatusCode, response::IntoResponse},
    std::sync::Arc,
};

pub async fn handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        format!(
            "OK v{}, uptime: {:?} seconds, storage: {}, probe timeout: {} ms",
            env!("CARGO_PKG_VERSION"),
            state.uptime.elapsed().as_secs(),
            state.config.storage.backend(),
            state.config.probe.timeout().as_millis()
        ),
    )
}
