use std::sync::Arc;

use crate::observability::metrics::Metrics;
use crate::push::RecordingPushGateway;
use crate::store::MemoryStore;

pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub push: Arc<RecordingPushGateway>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(change_buffer_size: usize, notification_history_size: usize) -> Self {
        Self {
            store: Arc::new(MemoryStore::new(change_buffer_size)),
            push: Arc::new(RecordingPushGateway::with_history_size(
                notification_history_size,
            )),
            metrics: Metrics::new(),
        }
    }
}
