use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::AppError;
use crate::models::change::OrderChange;
use crate::models::order::{OrderPatch, OrderRecord};
use crate::models::user::UserRecord;
use crate::store::UserDirectory;

/// In-process record store holding `users` and `orders`, with a change feed
/// over `orders/{orderId}`.
pub struct MemoryStore {
    users: DashMap<String, UserRecord>,
    orders: DashMap<String, OrderRecord>,
    changes_tx: broadcast::Sender<OrderChange>,
}

impl MemoryStore {
    pub fn new(change_buffer_size: usize) -> Self {
        let (changes_tx, _unused_rx) = broadcast::channel(change_buffer_size);

        Self {
            users: DashMap::new(),
            orders: DashMap::new(),
            changes_tx,
        }
    }

    /// Registers a new subscriber on the order change feed. Only changes made
    /// after this call are delivered to it.
    pub fn subscribe(&self) -> broadcast::Receiver<OrderChange> {
        self.changes_tx.subscribe()
    }

    pub fn put_user(&self, user_id: &str, user: UserRecord) {
        self.users.insert(user_id.to_string(), user);
    }

    pub fn user(&self, user_id: &str) -> Option<UserRecord> {
        self.users.get(user_id).map(|entry| entry.value().clone())
    }

    pub fn order(&self, order_id: &str) -> Option<OrderRecord> {
        self.orders.get(order_id).map(|entry| entry.value().clone())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Writes the whole order document, emitting `Created` for a new id and
    /// `Updated` otherwise. The change is published while the entry is still
    /// locked, so the feed sees writes to one order in apply order.
    pub fn put_order(&self, order_id: &str, order: OrderRecord) -> OrderChange {
        match self.orders.entry(order_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let before = entry.insert(order.clone());
                let change = OrderChange::Updated {
                    order_id: order_id.to_string(),
                    before,
                    after: order,
                };
                self.publish(change.clone());
                change
            }
            Entry::Vacant(entry) => {
                let _guard = entry.insert(order.clone());
                let change = OrderChange::Created {
                    order_id: order_id.to_string(),
                    data: order,
                };
                self.publish(change.clone());
                change
            }
        }
    }

    /// Merges `patch` into an existing order and emits `Updated`.
    pub fn patch_order(&self, order_id: &str, patch: OrderPatch) -> Result<OrderChange, AppError> {
        let mut order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

        let before = order.clone();
        order.apply(patch);

        let change = OrderChange::Updated {
            order_id: order_id.to_string(),
            before,
            after: order.clone(),
        };
        self.publish(change.clone());

        Ok(change)
    }

    fn publish(&self, change: OrderChange) {
        // No subscribers yet is not an error; the change is simply unobserved.
        if let Err(err) = self.changes_tx.send(change) {
            debug!(order_id = %err.0.order_id(), "order change had no subscribers");
        }
    }
}

impl UserDirectory for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.user(user_id))
    }

    async fn find_users_by_role(&self, role: &str) -> Result<Vec<UserRecord>, AppError> {
        let users = self
            .users
            .iter()
            .filter(|entry| entry.value().has_role(role))
            .map(|entry| entry.value().clone())
            .collect();

        Ok(users)
    }
}
