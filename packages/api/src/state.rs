use std::sync::Arc;

use shared::repositories::document_repository::DocumentRepository;
use shared::services::auth_service::AuthService;
use shared::services::booking_service::BookingService;
use shared::services::catalog_service::CatalogService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub catalog_service: Arc<CatalogService>,
    pub booking_service: Arc<BookingService>,
    /// Whether the token cookie carries the `Secure` attribute.
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn DocumentRepository + Send + Sync>,
        jwt_secret: String,
        secure_cookies: bool,
    ) -> Self {
        AppState {
            auth_service: Arc::new(AuthService::with_jwt_secret(jwt_secret)),
            catalog_service: Arc::new(CatalogService::new(repository.clone())),
            booking_service: Arc::new(BookingService::new(repository)),
            secure_cookies,
        }
    }
}
