//! Change-triggered notifiers for the `orders` collection.
//!
//! Each notifier decides from the snapshots alone whether its transition
//! happened, resolves recipient tokens through a [`UserDirectory`] and hands
//! at most one message to a [`PushGateway`].

pub mod courier_delivery;
pub mod customer_delivery;
pub mod new_order;
pub mod recipients;

use std::fmt;

use crate::error::AppError;
use crate::models::change::OrderChange;
use crate::push::PushGateway;
use crate::store::UserDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierKind {
    NewOrder,
    CourierDelivery,
    CustomerDelivery,
}

impl NotifierKind {
    pub const ALL: [NotifierKind; 3] = [
        NotifierKind::NewOrder,
        NotifierKind::CourierDelivery,
        NotifierKind::CustomerDelivery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotifierKind::NewOrder => "new_order",
            NotifierKind::CourierDelivery => "courier_delivery",
            NotifierKind::CustomerDelivery => "customer_delivery",
        }
    }

    /// Whether this notifier is bound to the change's operation.
    pub fn handles(&self, change: &OrderChange) -> bool {
        match (self, change) {
            (NotifierKind::NewOrder, OrderChange::Created { .. }) => true,
            (
                NotifierKind::CourierDelivery | NotifierKind::CustomerDelivery,
                OrderChange::Updated { .. },
            ) => true,
            _ => false,
        }
    }
}

impl fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The watched field did not move into its target value.
    NoTransition,
    /// No admin had a device token.
    NoRecipients,
    /// The single recipient is missing or has no device token.
    MissingToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Sent { recipients: usize },
    Skipped(SkipReason),
}

/// Runs `kind` against one change event.
///
/// Changes of an operation the notifier is not bound to are reported as
/// `Skipped(NoTransition)`.
pub async fn dispatch<S, P>(
    kind: NotifierKind,
    store: &S,
    push: &P,
    change: &OrderChange,
) -> Result<Dispatch, AppError>
where
    S: UserDirectory,
    P: PushGateway,
{
    match (kind, change) {
        (NotifierKind::NewOrder, OrderChange::Created { order_id, data }) => {
            new_order::notify_new_order(store, push, order_id, data).await
        }
        (NotifierKind::CourierDelivery, OrderChange::Updated { order_id, before, after }) => {
            courier_delivery::notify_courier_delivery(store, push, order_id, before, after).await
        }
        (NotifierKind::CustomerDelivery, OrderChange::Updated { order_id, before, after }) => {
            customer_delivery::notify_customer_delivery(store, push, order_id, before, after)
                .await
        }
        _ => Ok(Dispatch::Skipped(SkipReason::NoTransition)),
    }
}

#[cfg(test)]
mod tests {
    use super::{Dispatch, NotifierKind, SkipReason, dispatch};
    use crate::models::change::OrderChange;
    use crate::models::order::OrderRecord;
    use crate::models::user::UserRecord;
    use crate::push::RecordingPushGateway;
    use crate::store::MemoryStore;

    fn order(status: &str, delivery_status: &str) -> OrderRecord {
        OrderRecord {
            user_name: Some("Alice".to_string()),
            status: Some(status.to_string()),
            delivery_status: Some(delivery_status.to_string()),
            courier_id: Some("c1".to_string()),
            user_id: Some("u1".to_string()),
        }
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new(16);
        store.put_user(
            "c1",
            UserRecord {
                role: Some("courier".to_string()),
                fcm_token: Some("C".to_string()),
            },
        );
        store.put_user(
            "u1",
            UserRecord {
                role: Some("customer".to_string()),
                fcm_token: Some("U".to_string()),
            },
        );
        store
    }

    #[test]
    fn bindings_follow_operation() {
        let created = OrderChange::Created {
            order_id: "o1".to_string(),
            data: OrderRecord::default(),
        };
        let updated = OrderChange::Updated {
            order_id: "o1".to_string(),
            before: OrderRecord::default(),
            after: OrderRecord::default(),
        };

        assert!(NotifierKind::NewOrder.handles(&created));
        assert!(!NotifierKind::NewOrder.handles(&updated));
        assert!(NotifierKind::CourierDelivery.handles(&updated));
        assert!(!NotifierKind::CourierDelivery.handles(&created));
        assert!(NotifierKind::CustomerDelivery.handles(&updated));
        assert!(!NotifierKind::CustomerDelivery.handles(&created));
    }

    #[tokio::test]
    async fn one_update_can_fire_both_update_notifiers() {
        let store = seeded_store();
        let push = RecordingPushGateway::new();
        let change = OrderChange::Updated {
            order_id: "o1".to_string(),
            before: order("pending", "pending"),
            after: order("completed", "ongoing"),
        };

        for kind in [NotifierKind::CourierDelivery, NotifierKind::CustomerDelivery] {
            let outcome = dispatch(kind, &store, &push, &change).await.unwrap();
            assert_eq!(outcome, Dispatch::Sent { recipients: 1 });
        }

        let mut tokens: Vec<String> = push
            .records()
            .into_iter()
            .flat_map(|record| record.tokens)
            .collect();
        tokens.sort();
        assert_eq!(tokens, vec!["C".to_string(), "U".to_string()]);
    }

    #[tokio::test]
    async fn update_notifiers_only_watch_their_own_field() {
        let store = seeded_store();
        let push = RecordingPushGateway::new();
        let change = OrderChange::Updated {
            order_id: "o1".to_string(),
            before: order("pending", "pending"),
            after: order("pending", "ongoing"),
        };

        let courier = dispatch(NotifierKind::CourierDelivery, &store, &push, &change)
            .await
            .unwrap();
        let customer = dispatch(NotifierKind::CustomerDelivery, &store, &push, &change)
            .await
            .unwrap();

        assert_eq!(courier, Dispatch::Skipped(SkipReason::NoTransition));
        assert_eq!(customer, Dispatch::Sent { recipients: 1 });
        assert_eq!(push.len(), 1);
    }

    #[tokio::test]
    async fn unbound_operation_is_skipped() {
        let store = seeded_store();
        let push = RecordingPushGateway::new();
        let change = OrderChange::Created {
            order_id: "o1".to_string(),
            data: order("completed", "ongoing"),
        };

        let outcome = dispatch(NotifierKind::CourierDelivery, &store, &push, &change)
            .await
            .unwrap();

        assert_eq!(outcome, Dispatch::Skipped(SkipReason::NoTransition));
        assert!(push.is_empty());
    }
}
