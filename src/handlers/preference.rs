use {
    super::PreferenceResponseBody,
    crate::{registry::PreferenceSource, state::AppState},
    axum::{extract::State, Json},
    serde::Deserialize,
    std::sync::Arc,
};

#[derive(Debug, Deserialize, Clone)]
pub struct PreferenceRequest {
    pub source: PreferenceSource,
}

pub async fn get_handler(State(state): State<Arc<AppState>>) -> Json<PreferenceResponseBody> {
    Json(PreferenceResponseBody::new(
        &state.session.preference(),
        state.session.current_token(),
    ))
}

#[tracing::instrument(skip(state), level = "debug")]
pub async fn set_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PreferenceRequest>,
) -> Json<PreferenceResponseBody> {
    state.session.set_preference_source(request.source);
    get_handler(State(state)).await
}
