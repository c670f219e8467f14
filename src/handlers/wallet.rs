use {
    crate::{
        error::ResolverError,
        session::{SessionContext, WalletContext},
        state::AppState,
    },
    axum::{extract::State, Json},
    std::sync::Arc,
};

#[tracing::instrument(skip(state), level = "debug")]
pub async fn connect_handler(
    State(state): State<Arc<AppState>>,
    Json(wallet): Json<WalletContext>,
) -> Result<Json<SessionContext>, ResolverError> {
    state.session.connect_wallet(wallet)?;
    Ok(Json(state.session.context()))
}

#[tracing::instrument(skip_all, level = "debug")]
pub async fn disconnect_handler(State(state): State<Arc<AppState>>) -> Json<SessionContext> {
    state.session.disconnect_wallet();
    Json(state.session.context())
}
