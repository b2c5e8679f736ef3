//! Per-topic classification callbacks.
//!
//! Each callback is a pure function over `(topic, event, ctx)` — no captured
//! state, no I/O. The event body is never mutated here; enrichment happens
//! in the router, and only for events a callback approved.

use serde_json::Value;

use crate::classify::access::{nested_bool, nested_get, nested_str};
use crate::classify::specfile::specfile_changed;
use crate::config::{RelayConfig, SpecfileGate};

/// Koji tag names marking a non-mainline build lineage.
const SIDETAG_MARKER: &str = "-side-";

/// Build owner reserved for release engineering; never ours.
const RELENG_OWNER: &str = "releng";

/// A classification callback: decides relevance and produces a summary.
pub type Callback = fn(&str, &Value, &ClassifyContext) -> Classification;

/// Result of classifying one inbound event.
///
/// The summary is logged for every message, forwarded or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Human-readable description of the decision.
    pub summary: String,
    /// Whether the router should enrich and submit this event.
    pub forward: bool,
}

impl Classification {
    /// Event is relevant; enrich and submit it.
    pub fn forward(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            forward: true,
        }
    }

    /// Event is not for us; log the summary and drop it.
    pub fn suppress(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            forward: false,
        }
    }
}

/// Read-only context passed into every callback.
///
/// Built once at startup from [`RelayConfig`]; callbacks take it as an
/// explicit parameter instead of reading the environment.
#[derive(Debug, Clone)]
pub struct ClassifyContext {
    /// Account whose activity counts as our own automation.
    pub automation_user: String,
    /// Distro tag to select in dependency-update package mappings.
    pub target_distro: String,
    /// Push spec-file gate policy.
    pub specfile_gate: SpecfileGate,
    /// Deployment project name, consulted by the `ProjectPrefix` gate.
    pub project: String,
}

impl ClassifyContext {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            automation_user: config.automation_user.clone(),
            target_distro: config.target_distro.clone(),
            specfile_gate: config.specfile_gate,
            project: config.project.clone(),
        }
    }

    /// Should the spec-file gate apply to this deployment?
    fn gate_applies(&self) -> bool {
        match self.specfile_gate {
            SpecfileGate::Always => true,
            SpecfileGate::ProjectPrefix => self.project.starts_with("packit"),
            SpecfileGate::Never => false,
        }
    }
}

/// Render a field for a summary: strings verbatim, everything else as
/// compact JSON, absence as `?`.
fn field_text(event: &Value, path: &[&str]) -> String {
    match nested_get(event, path) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "?".to_string(),
    }
}

/// Fallback for topics missing from the dispatch table.
pub fn unknown(topic: &str, _event: &Value, _ctx: &ClassifyContext) -> Classification {
    Classification::suppress(format!("[IGNORE] Unknown message of topic '{topic}'"))
}

/// Copr build start/end: only builds run by our automation user.
pub fn copr(_topic: &str, event: &Value, ctx: &ClassifyContext) -> Classification {
    let user = nested_str(event, &["user"]);
    if user != Some(ctx.automation_user.as_str()) {
        return Classification::suppress(format!(
            "[Copr] Copr build owned by '{}' is not ours.",
            user.unwrap_or("?")
        ));
    }

    Classification::forward(format!("[Copr] {}", field_text(event, &["what"])))
}

/// Koji events: tag, build-state and task-state sub-kinds share the family;
/// the sub-kind is picked by topic substring, not by a body field.
pub fn koji(topic: &str, event: &Value, ctx: &ClassifyContext) -> Classification {
    if topic.contains("buildsys.tag") {
        let tag = nested_str(event, &["tag"]).unwrap_or("");
        if !tag.contains(SIDETAG_MARKER) {
            return Classification::suppress("[Koji] Koji build not tagged into a sidetag.");
        }

        return Classification::forward(format!(
            "[Koji] build:{} tag:{tag}",
            field_text(event, &["build_id"])
        ));
    }

    if topic.contains("buildsys.build.state") {
        if nested_str(event, &["task", "method"]) != Some("build") {
            return Classification::suppress("[Koji] Koji build with method other than 'build'.");
        }

        let owner = nested_str(event, &["owner"]);
        if owner == Some(RELENG_OWNER) {
            return Classification::suppress(format!("[Koji] Koji build built by '{RELENG_OWNER}'."));
        }
        if owner != Some(ctx.automation_user.as_str()) {
            return Classification::suppress(format!(
                "[Koji] Koji build not built by {}.",
                ctx.automation_user
            ));
        }

        return Classification::forward(format!(
            "[Koji] build:{} task:{} {}->{}",
            field_text(event, &["build_id"]),
            field_text(event, &["task_id"]),
            field_text(event, &["old"]),
            field_text(event, &["new"]),
        ));
    }

    // Scratch builds (task-state change): only ours are relevant.
    if nested_str(event, &["owner"]) != Some(ctx.automation_user.as_str()) {
        return Classification::suppress(format!(
            "[Koji] Koji scratch build not built by {}.",
            ctx.automation_user
        ));
    }

    Classification::forward(format!(
        "[Koji] id:{} {}->{}",
        field_text(event, &["id"]),
        field_text(event, &["old"]),
        field_text(event, &["new"]),
    ))
}

/// dist-git push: optionally gated on the change-set touching a spec file.
pub fn distgit_push(_topic: &str, event: &Value, ctx: &ClassifyContext) -> Classification {
    if ctx.gate_applies() && !specfile_changed(event) {
        return Classification::suppress("[dist-git] No spec-file change, ignoring the push.");
    }

    Classification::forward(format!(
        "[dist-git] Passing push: {} {}@{}",
        field_text(event, &["repo", "name"]),
        field_text(event, &["end_commit"]),
        field_text(event, &["branch"]),
    ))
}

fn pr_lifecycle(event: &Value, verb: &str) -> Classification {
    Classification::forward(format!(
        "[dist-git] PR #{} {verb} in {}",
        field_text(event, &["pullrequest", "id"]),
        field_text(event, &["pullrequest", "project", "fullname"]),
    ))
}

pub fn distgit_pr_new(_topic: &str, event: &Value, _ctx: &ClassifyContext) -> Classification {
    pr_lifecycle(event, "opened")
}

pub fn distgit_pr_updated(_topic: &str, event: &Value, _ctx: &ClassifyContext) -> Classification {
    pr_lifecycle(event, "updated")
}

pub fn distgit_pr_rebased(_topic: &str, event: &Value, _ctx: &ClassifyContext) -> Classification {
    pr_lifecycle(event, "rebased")
}

/// PR flag added/updated: only flags on our own pull requests.
pub fn distgit_pr_flag(_topic: &str, event: &Value, ctx: &ClassifyContext) -> Classification {
    if nested_str(event, &["pullrequest", "user", "name"]) != Some(ctx.automation_user.as_str()) {
        return Classification::suppress(format!(
            "[dist-git] Flag changed in a PR not created by {}, ignoring.",
            ctx.automation_user
        ));
    }

    Classification::forward(format!(
        "[dist-git] Flag on {} changed to '{}'",
        field_text(event, &["pullrequest", "project", "fullname"]),
        field_text(event, &["flag", "comment"]),
    ))
}

/// PR comment added: report the newest comment.
///
/// The topic contract says the comment list is non-empty when this fires;
/// an empty or absent list is treated as suppress-and-log rather than a
/// panic, so a malformed upstream event cannot take the consumer down.
pub fn distgit_pr_comment(_topic: &str, event: &Value, _ctx: &ClassifyContext) -> Classification {
    let project = field_text(event, &["pullrequest", "project", "fullname"]);

    let last_comment = nested_get(event, &["pullrequest", "comments"])
        .and_then(Value::as_array)
        .and_then(|comments| comments.last());

    let Some(comment) = last_comment else {
        return Classification::suppress(format!(
            "[dist-git] Comment event for {project} carries no comments, ignoring."
        ));
    };

    Classification::forward(format!(
        "[dist-git] For {project} new comment: '{}' from {}",
        field_text(comment, &["comment"]),
        field_text(comment, &["user", "name"]),
    ))
}

/// PR closed: only merged pull requests are relevant.
pub fn distgit_pr_closed(_topic: &str, event: &Value, _ctx: &ClassifyContext) -> Classification {
    let project = field_text(event, &["pullrequest", "project", "fullname"]);

    if !nested_bool(event, &["pullrequest", "merged"]) {
        return Classification::suppress(format!(
            "[dist-git] Pull request in {project} was closed, ignoring."
        ));
    }

    Classification::forward(format!("[dist-git] Merged pull request in {project}."))
}

/// Hotness bugzilla update: a new upstream version was filed downstream.
pub fn hotness_bugzilla(_topic: &str, event: &Value, _ctx: &ClassifyContext) -> Classification {
    Classification::forward(format!(
        "[Hotness] New update of package {} to version {}.",
        field_text(event, &["package"]),
        field_text(event, &["trigger", "msg", "project", "version"]),
    ))
}

/// Anitya version update: relevant only when a package mapping exists for
/// the target distro. First matching distro entry wins.
pub fn anitya_version_update(_topic: &str, event: &Value, ctx: &ClassifyContext) -> Classification {
    let package = nested_get(event, &["message", "packages"])
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|p| nested_str(p, &["distro"]) == Some(ctx.target_distro.as_str()))
        .and_then(|p| nested_str(p, &["package_name"]));

    let Some(package) = package else {
        return Classification::suppress(format!(
            "[Anitya] {} mapping is not configured for {}, ignoring.",
            ctx.target_distro,
            field_text(event, &["project", "name"]),
        ));
    };

    let new_versions = nested_get(event, &["message", "upstream_versions"])
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    Classification::forward(format!(
        "[Anitya] New versions of package {package}: '{new_versions}'"
    ))
}

pub fn openscanhub_task_started(
    _topic: &str,
    event: &Value,
    _ctx: &ClassifyContext,
) -> Classification {
    Classification::forward(format!(
        "[OpenScanHub] OpenScanHub task {} started.",
        field_text(event, &["task_id"])
    ))
}

pub fn openscanhub_task_finished(
    _topic: &str,
    event: &Value,
    _ctx: &ClassifyContext,
) -> Classification {
    Classification::forward(format!(
        "[OpenScanHub] OpenScanHub task {} finished with status {}: added.js={}, fixed.js={}.",
        field_text(event, &["task_id"]),
        field_text(event, &["status"]),
        field_text(event, &["added.js"]),
        field_text(event, &["fixed.js"]),
    ))
}
