use crate::models::order::OrderRecord;

/// A single change delivered by the `orders/{orderId}` feed.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
    Created {
        order_id: String,
        data: OrderRecord,
    },
    Updated {
        order_id: String,
        before: OrderRecord,
        after: OrderRecord,
    },
}

impl OrderChange {
    pub fn order_id(&self) -> &str {
        match self {
            OrderChange::Created { order_id, .. } | OrderChange::Updated { order_id, .. } => {
                order_id
            }
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            OrderChange::Created { .. } => "create",
            OrderChange::Updated { .. } => "update",
        }
    }
}
