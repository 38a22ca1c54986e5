use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use tracing::{debug, error};

use crate::{error::ApiError, middleware::auth::TOKEN_COOKIE, state::AppState};
use shared::models::auth::responses::SuccessResponse;
use shared::models::document::Document;
use shared::services::auth_service::AuthServiceTrait;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jwt", post(issue_token))
        .route("/logout", post(logout))
}

fn token_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::None)
        .path("/")
        .build()
}

/// Signs the submitted identity and hands it back as the `token` cookie.
async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(identity): Json<Document>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let email = identity.get("email").cloned();
    let token = state.auth_service.issue_token(identity).map_err(|e| {
        error!("Failed to issue token for {:?}: {}", email, e);
        ApiError::from(e)
    })?;

    debug!("Issued token for {:?}", email);
    Ok((
        jar.add(token_cookie(token, state.secure_cookies)),
        Json(SuccessResponse::ok()),
    ))
}

async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let mut cookie = token_cookie(String::new(), state.secure_cookies);
    cookie.make_removal();

    debug!("Cleared token cookie");
    (jar.add(cookie), Json(SuccessResponse::ok()))
}
