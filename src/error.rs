use {
    crate::{
        policy::ResolutionError,
        registry::RegistryError,
        storage::error::StorageError,
        transport::TransportError,
    },
    axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    },
    tracing::error,
};

pub type ResolverResult<T> = Result<T, ResolverError>;

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error(transparent)]
    EnvyError(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Transport error: {0}")]
    TransportError(#[from] TransportError),

    #[error("Invalid subject address: {0}")]
    InvalidAddress(String),

    #[error("Invalid read kind: {0}")]
    InvalidReadKind(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0:?}")]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ResolverError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Registry(RegistryError::InvalidUrl(_))
            | Self::InvalidAddress(_)
            | Self::InvalidReadKind(_) => StatusCode::BAD_REQUEST,
            Self::Registry(RegistryError::UnsupportedChain(_))
            | Self::Resolution(ResolutionError::UnsupportedChain(_)) => StatusCode::NOT_FOUND,
            Self::Resolution(_) => StatusCode::SERVICE_UNAVAILABLE,
            e => {
                error!("HTTP server error: {e:?}");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        (
            status,
            Json(serde_json::json!({
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}
