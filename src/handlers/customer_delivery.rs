use tracing::{debug, info};

use crate::error::AppError;
use crate::handlers::recipients::user_token;
use crate::handlers::{Dispatch, SkipReason};
use crate::models::order::{DELIVERY_STATUS_ONGOING, OrderRecord};
use crate::push::{Message, Notification, PushData, PushGateway};
use crate::store::UserDirectory;

pub const TITLE: &str = "Pesanan Dalam Perjalanan";
pub const BODY: &str = "Pesanan Anda sedang dalam perjalanan";
pub const ROUTE: &str = "/orders";

pub fn is_out_for_delivery(before: &OrderRecord, after: &OrderRecord) -> bool {
    !before.delivery_status_is(DELIVERY_STATUS_ONGOING)
        && after.delivery_status_is(DELIVERY_STATUS_ONGOING)
}

pub async fn notify_customer_delivery<S, P>(
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
    if !is_out_for_delivery(before, after) {
        return Ok(Dispatch::Skipped(SkipReason::NoTransition));
    }

    let Some(token) = user_token(store, after.user_id.as_deref()).await? else {
        debug!(order_id, "customer has no device token; skipping push");
        return Ok(Dispatch::Skipped(SkipReason::MissingToken));
    };

    push.send(Message {
        token,
        notification: Notification {
            title: TITLE.to_string(),
            body: BODY.to_string(),
        },
        data: PushData {
            route: ROUTE.to_string(),
            order_id: order_id.to_string(),
        },
    })
    .await?;

    info!(order_id, "customer in-transit push sent");
    Ok(Dispatch::Sent { recipients: 1 })
}
