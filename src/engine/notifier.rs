use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::handlers::{Dispatch, NotifierKind, dispatch};
use crate::models::change::OrderChange;
use crate::observability::metrics::Metrics;
use crate::push::PushGateway;
use crate::state::AppState;
use crate::store::UserDirectory;

/// Consumes one change-feed subscription on behalf of a single notifier until
/// the feed closes. A failed invocation is logged and counted; the binding
/// keeps going with the next event.
pub async fn run_notifier<S, P>(
    kind: NotifierKind,
    store: Arc<S>,
    push: Arc<P>,
    metrics: Metrics,
    mut changes: broadcast::Receiver<OrderChange>,
) where
    S: UserDirectory + 'static,
    P: PushGateway + 'static,
{
    info!(notifier = %kind, "notifier started");

    loop {
        let change = match changes.recv().await {
            Ok(change) => change,
            Err(RecvError::Lagged(skipped)) => {
                warn!(notifier = %kind, skipped, "notifier fell behind change feed");
                metrics
                    .change_events_lagged_total
                    .with_label_values(&[kind.as_str()])
                    .inc_by(skipped);
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        if !kind.handles(&change) {
            continue;
        }

        metrics
            .change_events_total
            .with_label_values(&[kind.as_str(), change.operation()])
            .inc();

        let start = Instant::now();
        let result = dispatch(kind, store.as_ref(), push.as_ref(), &change).await;
        metrics
            .notifier_latency_seconds
            .with_label_values(&[kind.as_str()])
            .observe(start.elapsed().as_secs_f64());

        let outcome = match result {
            Ok(Dispatch::Sent { .. }) => "sent",
            Ok(Dispatch::Skipped(reason)) => {
                debug!(notifier = %kind, order_id = %change.order_id(), ?reason, "notification skipped");
                "skipped"
            }
            Err(err) => {
                error!(
                    notifier = %kind,
                    order_id = %change.order_id(),
                    error = %err,
                    "notifier failed"
                );
                "error"
            }
        };

        metrics
            .notifications_total
            .with_label_values(&[kind.as_str(), outcome])
            .inc();
    }

    warn!(notifier = %kind, "notifier stopped: change feed closed");
}

/// Binds every notifier to its own subscription on the store's change feed.
pub fn spawn_notifiers(state: &AppState) -> Vec<JoinHandle<()>> {
    NotifierKind::ALL
        .into_iter()
        .map(|kind| {
            tokio::spawn(run_notifier(
                kind,
                state.store.clone(),
                state.push.clone(),
                state.metrics.clone(),
                state.store.subscribe(),
            ))
        })
        .collect()
}
