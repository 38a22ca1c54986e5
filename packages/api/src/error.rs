use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::services::errors::{
    auth_service_errors::AuthServiceError, record_service_errors::RecordServiceError,
};

#[derive(Debug)]
pub enum ApiError {
    AuthService(AuthServiceError),
    RecordService(RecordServiceError),
    Unauthorized,
    Forbidden,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: &'static str,
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        ApiError::AuthService(error)
    }
}

impl From<RecordServiceError> for ApiError {
    fn from(error: RecordServiceError) -> Self {
        ApiError::RecordService(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::AuthService(
                AuthServiceError::InvalidToken | AuthServiceError::ExpiredToken,
            )
            | ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            ApiError::AuthService(AuthServiceError::JwtError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }

            ApiError::Forbidden => (StatusCode::FORBIDDEN, "forbidden access"),

            ApiError::RecordService(RecordServiceError::InvalidIdentifier(_)) => {
                (StatusCode::BAD_REQUEST, "invalid identifier")
            }
            ApiError::RecordService(RecordServiceError::RepositoryError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}
