use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::document::Document;

pub const BOOKING_RECEIVER_EMAIL: &str = "emailOfServiceReceiver";
pub const BOOKING_PROVIDER_EMAIL: &str = "emailOfServiceProvider";
pub const BOOKING_STATUS: &str = "status";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookingStatusUpdateRequest {
    #[serde(default)]
    pub status: Option<Value>,
}

impl BookingStatusUpdateRequest {
    pub fn into_fields(self) -> Document {
        let mut fields = Document::new();
        fields.insert(
            BOOKING_STATUS.to_string(),
            self.status.unwrap_or(Value::Null),
        );
        fields
    }
}
