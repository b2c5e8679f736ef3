//! Event router — one invocation per inbound bus message.
//!
//! The router is topic-agnostic: it looks up the callback, logs the summary,
//! and either drops the event or enriches it and submits it to the task
//! queue. The dispatch table is the single extension point for new topics.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info};

use crate::classify::callbacks::unknown;
use crate::classify::{Classification, ClassifyContext, lookup};
use crate::error::Result;
use crate::liveness::Liveness;
use crate::queue::{TaskQueue, TaskSubmission};
use crate::source::BusSource;

/// Namespace prefix stripped off the topic to form the event type.
/// Topics from other namespaces pass through unchanged.
const TOPIC_NAMESPACE_PREFIX: &str = "org.fedoraproject.prod.";

/// What happened to one routed message.
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    /// Whether the event was submitted to the task queue.
    pub forwarded: bool,
    /// The classification summary (also logged).
    pub summary: String,
}

/// Routes classified events to the task queue.
pub struct EventRouter {
    queue: Arc<dyn TaskQueue>,
    liveness: Liveness,
    ctx: ClassifyContext,
}

impl EventRouter {
    pub fn new(queue: Arc<dyn TaskQueue>, liveness: Liveness, ctx: ClassifyContext) -> Self {
        Self {
            queue,
            liveness,
            ctx,
        }
    }

    /// Handle one inbound message.
    ///
    /// Exactly one summary line is logged per message, forwarded or not.
    /// The body is mutated only here, and only after the callback approved
    /// forwarding.
    pub async fn handle(&self, topic: &str, body: Value) -> Result<RouteOutcome> {
        self.liveness.touch().await;

        let classification = match lookup(topic) {
            Some(callback) => callback(topic, &body, &self.ctx),
            None => unknown(topic, &body, &self.ctx),
        };

        let Classification { summary, forward } = classification;
        info!(topic, forward, "{summary}");

        if !forward {
            return Ok(RouteOutcome {
                forwarded: false,
                summary,
            });
        }

        let event = enrich(body, topic);
        let event_type = topic
            .strip_prefix(TOPIC_NAMESPACE_PREFIX)
            .unwrap_or(topic)
            .to_string();

        let task_id = self
            .queue
            .submit(TaskSubmission::new(event, event_type))
            .await?;
        info!(%task_id, topic, "Task sent to the queue");

        Ok(RouteOutcome {
            forwarded: true,
            summary,
        })
    }

    /// Consume a bus source to exhaustion.
    ///
    /// Per-message failures (queue unreachable, broker rejection) are logged
    /// and do not stop the loop; retries belong to the transport.
    pub async fn consume<S: BusSource>(&self, mut source: S) -> Result<()> {
        while let Some(message) = source.next_message().await? {
            if let Err(e) = self.handle(&message.topic, message.body).await {
                error!(topic = %message.topic, error = %e, "Failed to route message");
            }
        }

        info!("Bus stream ended");
        Ok(())
    }
}

/// Add routing metadata: the originating topic and the capture timestamp
/// (epoch seconds at the point of enrichment, not original publication).
fn enrich(mut body: Value, topic: &str) -> Value {
    if let Some(event) = body.as_object_mut() {
        event.insert("topic".into(), Value::from(topic));
        let captured_at = Utc::now().timestamp_millis() as f64 / 1000.0;
        event.insert("timestamp".into(), Value::from(captured_at));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpecfileGate;
    use crate::error::{Error, QueueError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Capturing queue for router tests.
    #[derive(Default)]
    struct RecordingQueue {
        submissions: Mutex<Vec<TaskSubmission>>,
        fail: bool,
    }

    #[async_trait]
    impl TaskQueue for RecordingQueue {
        async fn submit(&self, submission: TaskSubmission) -> std::result::Result<Uuid, QueueError> {
            if self.fail {
                return Err(QueueError::Transport("broker unreachable".into()));
            }
            let id = submission.id;
            self.submissions.lock().unwrap().push(submission);
            Ok(id)
        }
    }

    fn router(queue: Arc<RecordingQueue>) -> (EventRouter, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ClassifyContext {
            automation_user: "packit".into(),
            target_distro: "CentOS".into(),
            specfile_gate: SpecfileGate::Never,
            project: String::new(),
        };
        let liveness = Liveness::new(dir.path().join("liveness"));
        (EventRouter::new(queue, liveness, ctx), dir)
    }

    #[tokio::test]
    async fn unknown_topic_is_dropped() {
        let queue = Arc::new(RecordingQueue::default());
        let (router, _dir) = router(queue.clone());

        let outcome = router
            .handle("org.example.unknown.topic", json!({}))
            .await
            .unwrap();

        assert!(!outcome.forwarded);
        assert!(outcome.summary.contains("org.example.unknown.topic"));
        assert!(queue.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn suppressed_event_never_reaches_the_queue() {
        let queue = Arc::new(RecordingQueue::default());
        let (router, _dir) = router(queue.clone());

        let outcome = router
            .handle(
                "org.fedoraproject.prod.copr.build.end",
                json!({"user": "someone-else", "what": "x"}),
            )
            .await
            .unwrap();

        assert!(!outcome.forwarded);
        assert!(queue.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn forwarded_event_is_enriched_and_submitted() {
        let queue = Arc::new(RecordingQueue::default());
        let (router, _dir) = router(queue.clone());

        let outcome = router
            .handle(
                "org.fedoraproject.prod.copr.build.end",
                json!({"user": "packit", "what": "build succeeded"}),
            )
            .await
            .unwrap();

        assert!(outcome.forwarded);
        assert!(outcome.summary.contains("build succeeded"));

        let submissions = queue.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        let submission = &submissions[0];
        assert_eq!(submission.event_type, "copr.build.end");
        assert_eq!(submission.event["topic"], "org.fedoraproject.prod.copr.build.end");
        assert!(submission.event["timestamp"].is_f64());
        // Original fields survive enrichment.
        assert_eq!(submission.event["user"], "packit");
    }

    #[tokio::test]
    async fn foreign_namespace_event_type_is_not_stripped() {
        let queue = Arc::new(RecordingQueue::default());
        let (router, _dir) = router(queue.clone());

        let topic = "org.release-monitoring.prod.anitya.project.version.update.v2";
        let body = json!({
            "message": {
                "packages": [{"distro": "CentOS", "package_name": "buildah"}],
                "upstream_versions": ["1.30.0"],
            },
        });

        let outcome = router.handle(topic, body).await.unwrap();
        assert!(outcome.forwarded);

        let submissions = queue.submissions.lock().unwrap();
        assert_eq!(submissions[0].event_type, topic);
    }

    #[tokio::test]
    async fn queue_failure_propagates() {
        let queue = Arc::new(RecordingQueue {
            fail: true,
            ..Default::default()
        });
        let (router, _dir) = router(queue);

        let result = router
            .handle(
                "org.fedoraproject.prod.copr.build.end",
                json!({"user": "packit", "what": "x"}),
            )
            .await;

        assert!(matches!(result, Err(Error::Queue(_))));
    }

    #[tokio::test]
    async fn liveness_is_touched_even_for_dropped_messages() {
        let queue = Arc::new(RecordingQueue::default());
        let (router, dir) = router(queue);

        router
            .handle("org.example.unknown.topic", json!({}))
            .await
            .unwrap();

        assert!(dir.path().join("liveness").exists());
    }

    #[test]
    fn enrich_leaves_non_object_bodies_alone() {
        let body = enrich(json!("scalar"), "t");
        assert_eq!(body, json!("scalar"));
    }
}
