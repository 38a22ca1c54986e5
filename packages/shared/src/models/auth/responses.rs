use serde::{Deserialize, Serialize};

/// Body returned by the login and logout endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        SuccessResponse { success: true }
    }
}
