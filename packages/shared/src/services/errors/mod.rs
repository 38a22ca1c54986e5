pub mod auth_service_errors;
pub mod record_service_errors;
