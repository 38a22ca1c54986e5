use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::auth::claims::TokenClaims;
use crate::models::document::Document;
use crate::services::errors::auth_service_errors::AuthServiceError;

/// Lifetime of every issued token, in seconds.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

pub trait AuthServiceTrait: Send + Sync {
    /// Signs whatever identity the caller submitted. Nothing about the caller
    /// is checked.
    fn issue_token(&self, identity: Document) -> Result<String, AuthServiceError>;
    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthServiceError>;
}

pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn with_jwt_secret(jwt_secret: String) -> Self {
        AuthService { jwt_secret }
    }

    pub fn issue_token_at(
        &self,
        mut identity: Document,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthServiceError> {
        // Registered claims always come from the issuer.
        identity.remove("exp");
        identity.remove("iat");

        let claims = TokenClaims {
            identity,
            exp: (issued_at + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp() as usize,
            iat: issued_at.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| AuthServiceError::JwtError(format!("{:#?}", e)))
    }
}

impl AuthServiceTrait for AuthService {
    fn issue_token(&self, identity: Document) -> Result<String, AuthServiceError> {
        self.issue_token_at(identity, Utc::now())
    }

    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // identities may carry any field, `aud` included
        validation.validate_aud = false;

        match decode::<TokenClaims>(token, &decoding_key, &validation) {
            Ok(token_data) => Ok(token_data.claims),
            Err(err) => match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    Err(AuthServiceError::ExpiredToken)
                }
                _ => Err(AuthServiceError::InvalidToken),
            },
        }
    }
}
