use {
    super::CandidatesResponseBody,
    crate::{chain_config::ChainId, error::ResolverError, state::AppState},
    axum::{
        extract::{Path, State},
        Json,
    },
    serde::Deserialize,
    std::sync::Arc,
};

#[derive(Debug, Deserialize, Clone)]
pub struct CustomEndpointRequest {
    pub url: String,
}

/// Stores the URL without contacting it. Callers probe afterwards.
#[tracing::instrument(skip(state), level = "debug")]
pub async fn set_handler(
    State(state): State<Arc<AppState>>,
    Path(chain_id): Path<ChainId>,
    Json(request): Json<CustomEndpointRequest>,
) -> Result<Json<CandidatesResponseBody>, ResolverError> {
    state.session.set_custom_endpoint(chain_id, &request.url)?;
    candidates(&state, chain_id)
}

#[tracing::instrument(skip(state), level = "debug")]
pub async fn clear_handler(
    State(state): State<Arc<AppState>>,
    Path(chain_id): Path<ChainId>,
) -> Result<Json<CandidatesResponseBody>, ResolverError> {
    state.session.clear_custom_endpoint(chain_id)?;
    candidates(&state, chain_id)
}

fn candidates(state: &AppState, chain_id: ChainId) -> Result<Json<CandidatesResponseBody>, ResolverError> {
    Ok(Json(CandidatesResponseBody {
        chain_id,
        candidates: state.session.list_candidates(chain_id)?,
        token: state.session.current_token(),
    }))
}
