use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
};
use derive_more::Display;
use serde::Serialize;
use utoipa::ToSchema;

/// Errors surfaced to API callers.
///
/// Validation and conflict failures are both reported as `400`, missing
/// entities as `404`. Storage failures are logged and hidden behind a
/// generic `500`.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "Internal Server Error")]
    Database(sqlx::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Database(e) = self {
            tracing::error!(error = %e, "Database error");
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            detail: self.to_string(),
        })
    }
}

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "employee not found")]
    pub detail: String,
}

/// Body of delete confirmations.
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Attendance record deleted successfully.")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Malformed or incomplete JSON bodies become `400 {"detail": ...}`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::validation(err.to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::validation(err.to_string()).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::validation(err.to_string()).into()
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::not_found("Not Found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::json;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::validation("invalid email").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::conflict("duplicate email").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("employee not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn error_body_uses_detail_key() {
        let resp = ApiError::not_found("employee not found").error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "detail": "employee not found" }));
    }

    #[actix_web::test]
    async fn database_error_does_not_leak() {
        let resp = ApiError::Database(sqlx::Error::PoolTimedOut).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["detail"], "Internal Server Error");
    }

    #[actix_web::test]
    async fn unmatched_route_uses_detail_key() {
        let err = route_not_found().await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Not Found");
    }
}
