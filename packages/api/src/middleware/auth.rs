use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::{error::ApiError, state::AppState};
use shared::models::auth::claims::TokenClaims;
use shared::services::auth_service::AuthServiceTrait;

/// Name of the cookie carrying the signed token.
pub const TOKEN_COOKIE: &str = "token";

/// Identity decoded from a valid `token` cookie. Extracting it rejects the
/// request with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: TokenClaims,
}

impl AuthenticatedUser {
    /// Passes only when `requested` equals the token's email claim byte for
    /// byte. A missing value on either side never matches.
    pub fn authorize_email<'a>(&self, requested: Option<&'a str>) -> Result<&'a str, ApiError> {
        match (requested, self.claims.email()) {
            (Some(requested), Some(claimed)) if requested == claimed => Ok(requested),
            (requested, claimed) => {
                warn!(
                    "Forbidden: query email {:?} does not match token email {:?}",
                    requested, claimed
                );
                Err(ApiError::Forbidden)
            }
        }
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = match jar.get(TOKEN_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
            _ => {
                warn!("Missing token cookie on {}", parts.uri.path());
                return Err(ApiError::Unauthorized);
            }
        };

        let claims = state.auth_service.verify_token(&token).map_err(|e| {
            warn!("Rejected token on {}: {}", parts.uri.path(), e);
            ApiError::from(e)
        })?;

        Ok(AuthenticatedUser { claims })
    }
}
