use serde::{Deserialize, Deserializer, Serialize};

pub const STATUS_COMPLETED: &str = "completed";
pub const DELIVERY_STATUS_ONGOING: &str = "ongoing";

/// Snapshot of an order document as stored in the `orders` collection.
///
/// Status values are opaque strings; only `completed` and `ongoing` carry
/// meaning for the notifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl OrderRecord {
    pub fn status_is(&self, value: &str) -> bool {
        self.status.as_deref() == Some(value)
    }

    pub fn delivery_status_is(&self, value: &str) -> bool {
        self.delivery_status.as_deref() == Some(value)
    }

    pub fn apply(&mut self, patch: OrderPatch) {
        if let Some(user_name) = patch.user_name {
            self.user_name = user_name;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(delivery_status) = patch.delivery_status {
            self.delivery_status = delivery_status;
        }
        if let Some(courier_id) = patch.courier_id {
            self.courier_id = courier_id;
        }
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
    }
}

/// Partial update merged into an existing order.
///
/// Outer `None` leaves the field as-is; `Some(None)` (JSON `null`) clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub user_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub delivery_status: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub courier_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub user_id: Option<Option<String>>,
}

// Only called for keys present in the document, so `null` maps to `Some(None)`.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
