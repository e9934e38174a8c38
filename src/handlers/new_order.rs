use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::handlers::recipients::role_tokens;
use crate::handlers::{Dispatch, SkipReason};
use crate::models::order::OrderRecord;
use crate::models::user::ROLE_ADMIN;
use crate::push::{MulticastMessage, Notification, PushData, PushGateway};
use crate::store::UserDirectory;

pub const TITLE: &str = "Pesanan Baru";
pub const ROUTE: &str = "/admin/orders";

pub fn body(order: &OrderRecord) -> String {
    format!(
        "Ada pesanan baru dari {}",
        order.user_name.as_deref().unwrap_or_default()
    )
}

/// Tells every admin with a registered device about a freshly created order.
pub async fn notify_new_order<S, P>(
    store: &S,
    push: &P,
    order_id: &str,
    order: &OrderRecord,
) -> Result<Dispatch, AppError>
where
    S: UserDirectory,
    P: PushGateway,
{
    let tokens = role_tokens(store, ROLE_ADMIN).await?;
    if tokens.is_empty() {
        debug!(order_id, "no admin device tokens; skipping new order push");
        return Ok(Dispatch::Skipped(SkipReason::NoRecipients));
    }

    let recipients = tokens.len();
    let response = push
        .send_multicast(MulticastMessage {
            tokens,
            notification: Notification {
                title: TITLE.to_string(),
                body: body(order),
            },
            data: PushData {
                route: ROUTE.to_string(),
                order_id: order_id.to_string(),
            },
        })
        .await?;

    if response.failure_count > 0 {
        warn!(
            order_id,
            failure_count = response.failure_count,
            "new order multicast had rejected tokens"
        );
    }
    info!(order_id, recipients, "new order push sent to admins");

    Ok(Dispatch::Sent { recipients })
}
