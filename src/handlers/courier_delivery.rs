use tracing::{debug, info};

use crate::error::AppError;
use crate::handlers::recipients::user_token;
use crate::handlers::{Dispatch, SkipReason};
use crate::models::order::{OrderRecord, STATUS_COMPLETED};
use crate::push::{Message, Notification, PushData, PushGateway};
use crate::store::UserDirectory;

pub const TITLE: &str = "Pesanan Siap Diantar";
pub const ROUTE: &str = "/courier/deliveries";

pub fn body(order_id: &str) -> String {
    format!("Pesanan #{order_id} siap untuk diantar")
}

/// True only on the update that moves `status` into `completed`.
pub fn is_ready_for_delivery(before: &OrderRecord, after: &OrderRecord) -> bool {
    !before.status_is(STATUS_COMPLETED) && after.status_is(STATUS_COMPLETED)
}

/// Tells the assigned courier that a completed order is ready to be picked up.
pub async fn notify_courier_delivery<S, P>(
    store: &S,
    push: &P,
    order_id: &str,
    before: &OrderRecord,
    after: &OrderRecord,
) -> Result<Dispatch, AppError>
where
    S: UserDirectory,
    P: PushGateway,
{
    if !is_ready_for_delivery(before, after) {
        return Ok(Dispatch::Skipped(SkipReason::NoTransition));
    }

    let Some(token) = user_token(store, after.courier_id.as_deref()).await? else {
        debug!(
            order_id,
            courier_id = after.courier_id.as_deref().unwrap_or_default(),
            "courier has no device token; skipping push"
        );
        return Ok(Dispatch::Skipped(SkipReason::MissingToken));
    };

    push.send(Message {
        token,
        notification: Notification {
            title: TITLE.to_string(),
            body: body(order_id),
        },
        data: PushData {
            route: ROUTE.to_string(),
            order_id: order_id.to_string(),
        },
    })
    .await?;

    info!(order_id, "courier delivery push sent");
    Ok(Dispatch::Sent { recipients: 1 })
}

#[cfg(test)]
mod tests {
    use super::{is_ready_for_delivery, notify_courier_delivery};
    use crate::error::AppError;
    use crate::handlers::{Dispatch, SkipReason};
    use crate::models::order::OrderRecord;
    use crate::models::user::UserRecord;
    use crate::push::recording::DeliveryKind;
    use crate::push::{PushData, RecordingPushGateway};
    use crate::store::{MemoryStore, UnavailableDirectory};

    fn with_status(status: Option<&str>, courier_id: Option<&str>) -> OrderRecord {
        OrderRecord {
            status: status.map(str::to_string),
            courier_id: courier_id.map(str::to_string),
            ..OrderRecord::default()
        }
    }

    fn courier(token: Option<&str>) -> UserRecord {
        UserRecord {
            role: Some("courier".to_string()),
            fcm_token: token.map(str::to_string),
        }
    }

    #[test]
    fn fires_only_on_entry_into_completed() {
        let values = [None, Some("pending"), Some("processing"), Some("completed")];

        for before in values {
            for after in values {
                let expected = before != Some("completed") && after == Some("completed");
                assert_eq!(
                    is_ready_for_delivery(&with_status(before, None), &with_status(after, None)),
                    expected,
                    "before={before:?} after={after:?}"
                );
            }
        }
    }

    #[tokio::test]
    async fn sends_to_courier_when_order_completes() {
        let store = MemoryStore::new(16);
        store.put_user("c1", courier(Some("T1")));
        let push = RecordingPushGateway::new();

        let outcome = notify_courier_delivery(
            &store,
            &push,
            "order-7",
            &with_status(Some("pending"), None),
            &with_status(Some("completed"), Some("c1")),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Dispatch::Sent { recipients: 1 });

        let records = push.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DeliveryKind::Single);
        assert_eq!(records[0].tokens, vec!["T1".to_string()]);
        assert_eq!(records[0].notification.title, "Pesanan Siap Diantar");
        assert_eq!(
            records[0].notification.body,
            "Pesanan #order-7 siap untuk diantar"
        );
        assert_eq!(
            records[0].data,
            PushData {
                route: "/courier/deliveries".to_string(),
                order_id: "order-7".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn already_completed_order_does_not_refire() {
        let store = MemoryStore::new(16);
        store.put_user("c1", courier(Some("T1")));
        let push = RecordingPushGateway::new();

        let outcome = notify_courier_delivery(
            &store,
            &push,
            "o1",
            &with_status(Some("completed"), Some("c1")),
            &with_status(Some("completed"), Some("c1")),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Dispatch::Skipped(SkipReason::NoTransition));
        assert!(push.is_empty());
    }

    #[tokio::test]
    async fn missing_courier_is_a_silent_skip() {
        let store = MemoryStore::new(16);
        store.put_user("c2", courier(None));
        let push = RecordingPushGateway::new();

        for courier_id in [None, Some("ghost"), Some("c2")] {
            let outcome = notify_courier_delivery(
                &store,
                &push,
                "o1",
                &with_status(Some("pending"), courier_id),
                &with_status(Some("completed"), courier_id),
            )
            .await
            .unwrap();

            assert_eq!(outcome, Dispatch::Skipped(SkipReason::MissingToken));
        }
        assert!(push.is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_is_returned() {
        let store = MemoryStore::new(16);
        store.put_user("c1", courier(Some("T1")));
        let push = RecordingPushGateway::new();
        push.reject_token("T1");

        let result = notify_courier_delivery(
            &store,
            &push,
            "o1",
            &with_status(Some("pending"), Some("c1")),
            &with_status(Some("completed"), Some("c1")),
        )
        .await;

        assert!(matches!(result, Err(AppError::Push(_))));
    }

    #[tokio::test]
    async fn courier_lookup_failure_is_returned_without_sending() {
        let push = RecordingPushGateway::new();

        let result = notify_courier_delivery(
            &UnavailableDirectory,
            &push,
            "o1",
            &with_status(Some("pending"), Some("c1")),
            &with_status(Some("completed"), Some("c1")),
        )
        .await;

        assert!(matches!(result, Err(AppError::Store(_))));
        assert!(push.is_empty());
    }
}
