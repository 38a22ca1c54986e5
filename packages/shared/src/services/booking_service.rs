use std::sync::Arc;

use crate::models::booking::{
    BookingStatusUpdateRequest, BOOKING_PROVIDER_EMAIL, BOOKING_RECEIVER_EMAIL,
};
use crate::models::document::{Collection, Document, Filter, InsertOneResult, UpdateResult};
use crate::repositories::document_repository::DocumentRepository;
use crate::services::catalog_service::ensure_document_id;
use crate::services::errors::record_service_errors::RecordServiceError;

pub struct BookingService {
    repository: Arc<dyn DocumentRepository + Send + Sync>,
}

impl BookingService {
    pub fn new(repository: Arc<dyn DocumentRepository + Send + Sync>) -> Self {
        BookingService { repository }
    }

    /// Bookings made by `email`.
    pub async fn bookings_for_receiver(
        &self,
        email: &str,
    ) -> Result<Vec<Document>, RecordServiceError> {
        Ok(self
            .repository
            .find(
                Collection::Bookings,
                &Filter::eq(BOOKING_RECEIVER_EMAIL, email),
            )
            .await?)
    }

    /// Bookings waiting on `email` as the provider.
    pub async fn bookings_for_provider(
        &self,
        email: &str,
    ) -> Result<Vec<Document>, RecordServiceError> {
        Ok(self
            .repository
            .find(
                Collection::Bookings,
                &Filter::eq(BOOKING_PROVIDER_EMAIL, email),
            )
            .await?)
    }

    pub async fn create_booking(
        &self,
        booking: Document,
    ) -> Result<InsertOneResult, RecordServiceError> {
        Ok(self
            .repository
            .insert_one(Collection::Bookings, booking)
            .await?)
    }

    pub async fn update_booking_status(
        &self,
        id: &str,
        update: BookingStatusUpdateRequest,
    ) -> Result<UpdateResult, RecordServiceError> {
        ensure_document_id(id)?;
        Ok(self
            .repository
            .update_one(
                Collection::Bookings,
                &Filter::by_id(id),
                update.into_fields(),
                false,
            )
            .await?)
    }
}
