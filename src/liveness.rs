//! Liveness side channel — a marker file for the deployment health check.

use std::path::PathBuf;

use tracing::warn;

/// Touches a marker file so the health check can see the consumer is alive.
///
/// Touched on every routed message, regardless of classification outcome.
/// Failures are logged, never fatal — a broken health marker must not take
/// the consumer down.
#[derive(Debug, Clone)]
pub struct Liveness {
    path: PathBuf,
}

impl Liveness {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create or refresh the marker file.
    pub async fn touch(&self) {
        if let Err(e) = tokio::fs::write(&self.path, b"").await {
            warn!(path = %self.path.display(), error = %e, "Failed to touch liveness file");
        }
    }
}
