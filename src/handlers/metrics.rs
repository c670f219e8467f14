use {
    crate::state::AppState,
    axum::{
        extract::State,
        http::{header, StatusCode},
        response::IntoResponse,
    },
    std::sync::Arc,
};

pub async fn handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
