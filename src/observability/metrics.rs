use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub change_events_total: IntCounterVec,
    pub change_events_lagged_total: IntCounterVec,
    pub notifications_total: IntCounterVec,
    pub notifier_latency_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let change_events_total = IntCounterVec::new(
            Opts::new(
                "change_events_total",
                "Order change events received by each notifier binding",
            ),
            &["notifier", "operation"],
        )
        .expect("valid change_events_total metric");

        let change_events_lagged_total = IntCounterVec::new(
            Opts::new(
                "change_events_lagged_total",
                "Order change events dropped because a notifier fell behind",
            ),
            &["notifier"],
        )
        .expect("valid change_events_lagged_total metric");

        let notifications_total = IntCounterVec::new(
            Opts::new("notifications_total", "Notifier invocations by outcome"),
            &["notifier", "outcome"],
        )
        .expect("valid notifications_total metric");

        let notifier_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "notifier_latency_seconds",
                "Latency of a single notifier invocation in seconds",
            ),
            &["notifier"],
        )
        .expect("valid notifier_latency_seconds metric");

        registry
            .register(Box::new(change_events_total.clone()))
            .expect("register change_events_total");
        registry
            .register(Box::new(change_events_lagged_total.clone()))
            .expect("register change_events_lagged_total");
        registry
            .register(Box::new(notifications_total.clone()))
            .expect("register notifications_total");
        registry
            .register(Box::new(notifier_latency_seconds.clone()))
            .expect("register notifier_latency_seconds");

        Self {
            registry,
            change_events_total,
            change_events_lagged_total,
            notifications_total,
            notifier_latency_seconds,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
