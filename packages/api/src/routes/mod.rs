use axum::{routing::get, Router};
use serde::Deserialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, TraceLayer};
use tracing::Level;

use crate::state::AppState;

pub mod auth;
pub mod bookings;
pub mod health;
pub mod services;

/// `?email=` filter accepted by the per-user listing endpoints.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_check))
        .merge(auth::routes())
        .merge(services::routes())
        .merge(bookings::routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO)),
        )
        .with_state(state)
}
