use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use order_notifier::api;
use order_notifier::config::Config;
use order_notifier::engine::notifier::spawn_notifiers;
use order_notifier::error::AppError;
use order_notifier::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let shared_state = Arc::new(AppState::new(
        config.change_buffer_size,
        config.notification_history_size,
    ));

    let notifiers = spawn_notifiers(&shared_state);
    tracing::info!(notifiers = notifiers.len(), "order notifiers bound to change feed");

    let app = api::rest::router(shared_state.clone());

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    for notifier in notifiers {
        notifier.abort();
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
