use {
    crate::{
        chain_config::ChainId,
        error::ResolverError,
        session::ProbeOutcome,
        state::AppState,
    },
    axum::{
        extract::{Path, State},
        Json,
    },
    serde::Deserialize,
    std::sync::Arc,
};

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProbeRequest {
    pub url: String,
    /// Defaults to the session's subject address.
    pub subject_address: Option<String>,
}

#[tracing::instrument(skip(state, request), fields(url = %request.url), level = "debug")]
pub async fn handler(
    State(state): State<Arc<AppState>>,
    Path(chain_id): Path<ChainId>,
    Json(request): Json<ProbeRequest>,
) -> Result<Json<ProbeOutcome>, ResolverError> {
    let subject_address = request
        .subject_address
        .or_else(|| state.session.context().subject_address)
        .ok_or_else(|| ResolverError::InvalidAddress("no subject address".to_string()))?;

    let outcome = state
        .session
        .probe_tracked(chain_id, &request.url, &subject_address)
        .await?;
    state
        .metrics
        .add_probe(&outcome.result, outcome.disposition);
    Ok(Json(outcome))
}
