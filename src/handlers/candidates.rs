use {
    super::CandidatesResponseBody,
    crate::{chain_config::ChainId, error::ResolverError, state::AppState},
    axum::{
        extract::{Path, State},
        Json,
    },
    std::sync::Arc,
};

#[tracing::instrument(skip(state), level = "debug")]
pub async fn handler(
    State(state): State<Arc<AppState>>,
    Path(chain_id): Path<ChainId>,
) -> Result<Json<CandidatesResponseBody>, ResolverError> {
    Ok(Json(CandidatesResponseBody {
        chain_id,
        candidates: state.session.list_candidates(chain_id)?,
        token: state.session.current_token(),
    }))
}
