use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use dua_model::ModelError;
use dua_store::StoreError;

use crate::routes::ENDPOINTS;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Endpoint not found: {path}")]
    NotFound { path: String },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoints: Option<&'static [&'static str]>,
}

impl ApiError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidArgument(message) => Self::InvalidArgument(message),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::EmptySelection => {
                Self::InvalidArgument("fields selects no valid column".to_string())
            }
            other => Self::InvalidArgument(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let endpoints = match self {
            ApiError::NotFound { ref path } => {
                warn!(%path, "Unknown endpoint");
                Some(ENDPOINTS)
            }
            ApiError::StoreUnavailable(ref message) => {
                error!(%message, "Query failed");
                None
            }
            ApiError::InvalidArgument(_) => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            endpoints,
        };

        (status, Json(body)).into_response()
    }
}
