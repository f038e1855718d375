use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use eyre;
use mediapub_core::form::FormErrors;
use tracing::error;

use crate::schema::FormErrorsResponse;

#[derive(Debug)]
pub enum HttpError {
    Internal(eyre::Error),
    NotFound(String),
    BadRequest(String),
    InvalidForm(FormErrors),
}

impl HttpError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        HttpError::NotFound(format!("{} not found", what))
    }
}

// Tell axum how to convert `HttpError` into a response.
impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::Internal(err) => {
                error!("request failed: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Server error: {}", err),
                )
                    .into_response()
            }
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            HttpError::InvalidForm(errors) => (
                StatusCode::BAD_REQUEST,
                Json(FormErrorsResponse::from(&errors)),
            )
                .into_response(),
        }
    }
}

macro_rules! impl_from {
    ($from:ty) => {
        impl From<$from> for HttpError {
            fn from(err: $from) -> Self {
                Self::Internal(err.into())
            }
        }
    };
}

impl_from!(std::io::Error);
impl_from!(color_eyre::Report);

impl From<FormErrors> for HttpError {
    fn from(errors: FormErrors) -> Self {
        Self::InvalidForm(errors)
    }
}

pub type ApiResult<T> = Result<T, HttpError>;

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::Internal(err) => write!(f, "{}", err),
            HttpError::NotFound(msg) | HttpError::BadRequest(msg) => write!(f, "{}", msg),
            HttpError::InvalidForm(errors) => write!(f, "{}", errors),
        }
    }
}
