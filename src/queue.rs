//! Task queue collaborator — submits enriched events for async processing.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::error::QueueError;

/// Logical entry point of the downstream worker.
pub const TASK_NAME: &str = "task.dispatcher.process_message";

/// Queue the downstream worker consumes relay events from.
pub const TASK_QUEUE: &str = "short-running";

/// Origin marker attached to every submission.
pub const TASK_SOURCE: &str = "fedora-messaging";

/// One task submission, as handed to the broker.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSubmission {
    /// Client-generated task id.
    pub id: Uuid,
    /// Worker entry point.
    pub task: &'static str,
    /// Broker queue name.
    pub queue: &'static str,
    /// The enriched event body.
    pub event: Value,
    /// Where the event came from.
    pub source: &'static str,
    /// Topic with the fixed namespace prefix stripped.
    pub event_type: String,
}

impl TaskSubmission {
    pub fn new(event: Value, event_type: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            task: TASK_NAME,
            queue: TASK_QUEUE,
            event,
            source: TASK_SOURCE,
            event_type,
        }
    }
}

/// Seam between the router and the broker, so the router is testable
/// without a real queue.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Submit a task; returns the task id accepted by the broker.
    async fn submit(&self, submission: TaskSubmission) -> Result<Uuid, QueueError>;
}

/// Broker client POSTing submissions to the queue bridge endpoint.
pub struct HttpTaskQueue {
    client: reqwest::Client,
    broker_url: String,
}

impl HttpTaskQueue {
    pub fn new(broker_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            broker_url: broker_url.into(),
        }
    }

    fn submit_url(&self) -> String {
        format!("{}/tasks", self.broker_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TaskQueue for HttpTaskQueue {
    async fn submit(&self, submission: TaskSubmission) -> Result<Uuid, QueueError> {
        let task_id = submission.id;

        let response = self
            .client
            .post(self.submit_url())
            .json(&submission)
            .send()
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueueError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(%task_id, "Broker accepted task");
        Ok(task_id)
    }
}
