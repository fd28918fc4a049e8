use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    web, HttpRequest, HttpResponse, ResponseError,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StoreError;
use crate::validation::{FieldError, Validate};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthorized")]
    Unauthorized,

    /// Carries the entity name shown to clients ("Product", "Blog post").
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::MissingReference(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Database(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation(details) => {
                json!({ "error": "Validation error", "details": details })
            }
            ApiError::InvalidCredentials => json!({ "error": "Invalid credentials" }),
            ApiError::Unauthorized => json!({ "error": "Unauthorized" }),
            ApiError::NotFound(entity) => json!({ "error": format!("{entity} not found") }),
            ApiError::Store(err @ StoreError::Conflict(_)) => json!({ "error": err.to_string() }),
            ApiError::Store(err @ StoreError::MissingReference(_)) => json!({
                "error": "Validation error",
                "details": [{ "field": "postId", "message": err.to_string() }],
            }),
            ApiError::Store(StoreError::Database(_)) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                json!({ "error": "Internal server error" })
            }
        };
        HttpResponse::build(status).json(body)
    }
}

/// Runs the input's field checks, turning failures into a 400.
pub fn validated<T: Validate>(input: T) -> ApiResult<T> {
    input.validate()?;
    Ok(input)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::field("body", err.to_string()).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::field("query", err.to_string()).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::field("id", err.to_string()).into()
}

/// Extractor configs that report malformed bodies, queries and ids with the
/// same 400 envelope as field validation.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            // data-URI images can be large
            .limit(4 * 1024 * 1024)
            .error_handler(json_error),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error))
    .app_data(web::PathConfig::default().error_handler(path_error));
}
