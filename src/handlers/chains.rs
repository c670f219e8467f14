use {
    crate::state::AppState,
    axum::{
        extract::State,
        http::header::CACHE_CONTROL,
        response::{IntoResponse, Response},
        Json,
    },
    std::sync::Arc,
};

#[tracing::instrument(skip_all, level = "debug")]
pub async fn handler(State(state): State<Arc<AppState>>) -> Response {
    // The chain table is fixed for the lifetime of the process
    let ttl_secs = 60 * 60;

    (
        [(CACHE_CONTROL, format!("public, max-age={ttl_secs}"))],
        Json(state.session.chains()),
    )
        .into_response()
}
