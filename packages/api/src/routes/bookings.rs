use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use tracing::{debug, error};

use crate::routes::EmailQuery;
use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::models::booking::BookingStatusUpdateRequest;
use shared::models::document::{Document, InsertOneResult, UpdateResult};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(my_bookings).post(create_booking))
        .route("/bookings/{id}", patch(update_booking_status))
        .route("/my-schedules/bookings", get(my_bookings))
        .route("/my-schedules/pending-works", get(pending_works))
}

/// Bookings the caller made as a receiver.
async fn my_bookings(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let email = authenticated_user.authorize_email(query.email.as_deref())?;
    state
        .booking_service
        .bookings_for_receiver(email)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list bookings for {}: {}", email, e);
            ApiError::from(e)
        })
}

/// Bookings waiting on the caller as a provider.
async fn pending_works(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let email = authenticated_user.authorize_email(query.email.as_deref())?;
    state
        .booking_service
        .bookings_for_provider(email)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list pending works for {}: {}", email, e);
            ApiError::from(e)
        })
}

async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = state
        .booking_service
        .create_booking(booking)
        .await
        .map_err(|e| {
            error!("Failed to add booking: {}", e);
            ApiError::from(e)
        })?;
    debug!("Booking added with _id {}", result.inserted_id);
    Ok(Json(result))
}

async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<BookingStatusUpdateRequest>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state
        .booking_service
        .update_booking_status(&id, update)
        .await
        .map_err(|e| {
            error!("Failed to update booking {}: {}", id, e);
            ApiError::from(e)
        })?;
    debug!(
        "{} document(s) matched the filter, updated {} document(s)",
        result.matched_count, result.modified_count
    );
    Ok(Json(result))
}
