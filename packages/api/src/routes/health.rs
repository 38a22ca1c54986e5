use axum::http::StatusCode;

/// Liveness endpoint
pub async fn health_check() -> (StatusCode, String) {
    (StatusCode::OK, "PrintHub server is running".to_string())
}
