use {
    crate::{
        chain_config::ChainId,
        error::ResolverError,
        policy::{EndpointConfig, ReadKind, ResolutionState},
        state::AppState,
    },
    axum::{
        extract::{Path, Query, State},
        Json,
    },
    serde::{Deserialize, Serialize},
    std::{str::FromStr, sync::Arc},
};

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EndpointQueryParams {
    /// `current` when absent.
    pub kind: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EndpointResponseBody {
    #[serde(flatten)]
    pub config: EndpointConfig,
    pub kind: ReadKind,
    pub resolution: ResolutionState,
}

#[tracing::instrument(skip(state), level = "debug")]
pub async fn handler(
    State(state): State<Arc<AppState>>,
    Path(chain_id): Path<ChainId>,
    Query(query): Query<EndpointQueryParams>,
) -> Result<Json<EndpointResponseBody>, ResolverError> {
    let kind = match query.kind.as_deref() {
        None => ReadKind::default(),
        Some(kind) => {
            ReadKind::from_str(kind).map_err(|_| ResolverError::InvalidReadKind(kind.into()))?
        }
    };

    let resolved = state.session.get_endpoint_config(chain_id, kind);
    state.metrics.add_resolution(chain_id, kind, &resolved);
    let config = resolved?;
    Ok(Json(EndpointResponseBody {
        config,
        kind,
        resolution: state.session.resolution_state(chain_id, kind),
    }))
}
