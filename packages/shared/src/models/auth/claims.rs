use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::document::Document;

/// JWT payload: the caller's identity fields at the top level, plus the
/// registered timestamps set by the issuer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub identity: Document,
    pub exp: usize,
    pub iat: usize,
}

impl TokenClaims {
    pub fn email(&self) -> Option<&str> {
        self.identity.get("email").and_then(Value::as_str)
    }
}
