use crate::application::{ApplicationResult, error::ApplicationError, validation::ModelState};
use crate::domain::errors::DomainError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
    errors: Option<ModelState>,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ApplicationError::InvalidModel(state) => Self {
                status: StatusCode::BAD_REQUEST,
                message: "one or more fields are invalid".into(),
                errors: Some(state),
            },
            ApplicationError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ApplicationError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg),
            ApplicationError::Unauthorized(msg) => Self::new(StatusCode::UNAUTHORIZED, msg),
            ApplicationError::Forbidden(msg) => Self::new(StatusCode::FORBIDDEN, msg),
            ApplicationError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "infrastructure failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApplicationError::Domain(domain_err) => Self::from_domain(domain_err),
        }
    }

    fn from_domain(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            DomainError::Conflict(_) => Self::new(StatusCode::CONFLICT, err.to_string()),
            DomainError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            DomainError::Persistence(_) => {
                tracing::error!(error = %err, "persistence failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }

    fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            errors: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorBody {
            error: self
                .status
                .canonical_reason()
                .unwrap_or("error")
                .to_string(),
            message: self.message,
            errors: self.errors,
        };
        (self.status, Json(payload)).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ModelState>,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}

/// Fails with the collected field errors unless the model is valid.
pub fn ensure_valid(state: ModelState) -> HttpResult<()> {
    if state.is_valid() {
        Ok(())
    } else {
        Err(HttpError::from_error(ApplicationError::InvalidModel(state)))
    }
}
