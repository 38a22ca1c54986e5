use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::document::Document;

pub const SERVICE_OWNER_EMAIL: &str = "email";
/// Field the delete endpoint filters on. It is never written by this backend.
pub const SERVICE_SELECTED_ID: &str = "selectedId";

/// Body accepted by the service update endpoints. Missing fields are
/// written as `null`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdateRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub provider: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub service_area: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub image: Option<Value>,
}

impl ServiceUpdateRequest {
    /// Maps the request onto the stored field names.
    pub fn into_fields(self) -> Document {
        let mut fields = Document::new();
        let mut set = |field: &str, value: Option<Value>| {
            fields.insert(field.to_string(), value.unwrap_or(Value::Null));
        };
        set("nameOfService", self.name);
        set("nameOfServiceProvider", self.provider);
        set(SERVICE_OWNER_EMAIL, self.email);
        set("price", self.price);
        set("serviceArea", self.service_area);
        set("description", self.description);
        set("image", self.image);
        fields
    }
}
