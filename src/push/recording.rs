use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use dashmap::DashSet;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::push::{
    BatchResponse, Message, MulticastMessage, Notification, PushData, PushGateway, SendResponse,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    Single,
    Multicast,
}

/// One accepted gateway call, as kept by [`RecordingPushGateway`].
#[derive(Debug, Clone, Serialize)]
pub struct PushRecord {
    pub id: Uuid,
    pub kind: DeliveryKind,
    pub tokens: Vec<String>,
    pub notification: Notification,
    pub data: PushData,
    pub sent_at: DateTime<Utc>,
}

pub const DEFAULT_HISTORY_SIZE: usize = 1024;

/// Push gateway that accepts every call, logs it and keeps the most recent
/// `history_size` calls for inspection. Tokens registered through
/// `reject_token` fail individually.
pub struct RecordingPushGateway {
    history_size: usize,
    records: Mutex<VecDeque<PushRecord>>,
    rejected_tokens: DashSet<String>,
}

impl RecordingPushGateway {
    pub fn new() -> Self {
        Self::with_history_size(DEFAULT_HISTORY_SIZE)
    }

    pub fn with_history_size(history_size: usize) -> Self {
        Self {
            history_size,
            records: Mutex::new(VecDeque::with_capacity(history_size.min(DEFAULT_HISTORY_SIZE))),
            rejected_tokens: DashSet::new(),
        }
    }

    pub fn reject_token(&self, token: &str) {
        self.rejected_tokens.insert(token.to_string());
    }

    /// Retained calls, oldest first.
    pub fn records(&self) -> Vec<PushRecord> {
        self.history().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.history().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history().is_empty()
    }

    fn history(&self) -> MutexGuard<'_, VecDeque<PushRecord>> {
        // Records are plain data; a panic mid-push cannot leave them inconsistent.
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(
        &self,
        kind: DeliveryKind,
        tokens: Vec<String>,
        notification: Notification,
        data: PushData,
    ) -> Uuid {
        let record = PushRecord {
            id: Uuid::new_v4(),
            kind,
            tokens,
            notification,
            data,
            sent_at: Utc::now(),
        };
        let id = record.id;

        let mut history = self.history();
        history.push_back(record);
        while history.len() > self.history_size {
            history.pop_front();
        }

        id
    }
}

impl Default for RecordingPushGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PushGateway for RecordingPushGateway {
    async fn send(&self, message: Message) -> Result<String, AppError> {
        if self.rejected_tokens.contains(&message.token) {
            return Err(AppError::Push(format!(
                "registration token rejected: {}",
                message.token
            )));
        }

        let id = self.record(
            DeliveryKind::Single,
            vec![message.token],
            message.notification,
            message.data,
        );

        info!(message_id = %id, "push sent");
        Ok(id.to_string())
    }

    async fn send_multicast(&self, message: MulticastMessage) -> Result<BatchResponse, AppError> {
        let id = self.record(
            DeliveryKind::Multicast,
            message.tokens.clone(),
            message.notification,
            message.data,
        );

        let responses: Vec<SendResponse> = message
            .tokens
            .iter()
            .map(|token| {
                if self.rejected_tokens.contains(token) {
                    SendResponse {
                        message_id: None,
                        error: Some("registration token rejected".to_string()),
                    }
                } else {
                    SendResponse {
                        message_id: Some(format!("{id}:{token}")),
                        error: None,
                    }
                }
            })
            .collect();

        let failure_count = responses.iter().filter(|r| r.error.is_some()).count();
        let success_count = responses.len() - failure_count;

        if failure_count > 0 {
            warn!(message_id = %id, failure_count, "multicast partially rejected");
        }
        info!(message_id = %id, success_count, "multicast sent");

        Ok(BatchResponse {
            success_count,
            failure_count,
            responses,
        })
    }
}
