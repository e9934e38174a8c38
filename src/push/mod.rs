pub mod recording;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use recording::RecordingPushGateway;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Data payload delivered alongside every notification; `route` is the
/// client-side screen to open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushData {
    pub route: String,
    pub order_id: String,
}

/// Single-target message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub token: String,
    pub notification: Notification,
    pub data: PushData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticastMessage {
    pub tokens: Vec<String>,
    pub notification: Notification,
    pub data: PushData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub message_id: Option<String>,
    pub error: Option<String>,
}

/// Per-token results of a multicast, in the order of `MulticastMessage::tokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<SendResponse>,
}

/// Outbound push-delivery service.
///
/// An `Err` means the call itself failed. Individual token failures inside a
/// multicast are reported through [`BatchResponse`] instead.
pub trait PushGateway: Send + Sync {
    /// Sends to one device and returns the provider's message id.
    fn send(&self, message: Message) -> impl Future<Output = Result<String, AppError>> + Send;

    fn send_multicast(
        &self,
        message: MulticastMessage,
    ) -> impl Future<Output = Result<BatchResponse, AppError>> + Send;
}
