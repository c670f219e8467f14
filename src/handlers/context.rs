use {
    crate::{
        chain_config::ChainId,
        error::ResolverError,
        session::SessionContext,
        state::AppState,
    },
    axum::{extract::State, Json},
    serde::Deserialize,
    std::sync::Arc,
};

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainRequest {
    pub chain_id: ChainId,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRequest {
    pub subject_address: Option<String>,
}

pub async fn get_handler(State(state): State<Arc<AppState>>) -> Json<SessionContext> {
    Json(state.session.context())
}

#[tracing::instrument(skip(state), level = "debug")]
pub async fn switch_chain_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SwitchChainRequest>,
) -> Result<Json<SessionContext>, ResolverError> {
    state.session.switch_chain(request.chain_id)?;
    Ok(Json(state.session.context()))
}

#[tracing::instrument(skip(state), level = "debug")]
pub async fn subject_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubjectRequest>,
) -> Result<Json<SessionContext>, ResolverError> {
    state.session.set_subject_address(request.subject_address)?;
    Ok(Json(state.session.context()))
}
