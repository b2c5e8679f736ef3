//! Topic dispatch table.
//!
//! The single source of truth for which topics this relay understands.
//! Topics added or removed here must also be added/removed in the bus
//! subscription configuration of the deployment.

use crate::classify::callbacks::{self, Callback};

/// All topics with a dedicated callback, paired with that callback.
const TABLE: &[(&str, Callback)] = &[
    ("org.fedoraproject.prod.copr.build.end", callbacks::copr),
    ("org.fedoraproject.prod.copr.build.start", callbacks::copr),
    (
        "org.fedoraproject.prod.buildsys.task.state.change",
        callbacks::koji,
    ),
    (
        "org.fedoraproject.prod.buildsys.build.state.change",
        callbacks::koji,
    ),
    ("org.fedoraproject.prod.buildsys.tag", callbacks::koji),
    (
        "org.fedoraproject.prod.pagure.git.receive",
        callbacks::distgit_push,
    ),
    (
        "org.fedoraproject.prod.pagure.pull-request.new",
        callbacks::distgit_pr_new,
    ),
    (
        "org.fedoraproject.prod.pagure.pull-request.updated",
        callbacks::distgit_pr_updated,
    ),
    (
        "org.fedoraproject.prod.pagure.pull-request.rebased",
        callbacks::distgit_pr_rebased,
    ),
    (
        "org.fedoraproject.prod.pagure.pull-request.flag.added",
        callbacks::distgit_pr_flag,
    ),
    (
        "org.fedoraproject.prod.pagure.pull-request.flag.updated",
        callbacks::distgit_pr_flag,
    ),
    (
        "org.fedoraproject.prod.pagure.pull-request.comment.added",
        callbacks::distgit_pr_comment,
    ),
    (
        "org.fedoraproject.prod.pagure.pull-request.closed",
        callbacks::distgit_pr_closed,
    ),
    (
        "org.fedoraproject.prod.hotness.update.bug.file",
        callbacks::hotness_bugzilla,
    ),
    (
        "org.release-monitoring.prod.anitya.project.version.update.v2",
        callbacks::anitya_version_update,
    ),
    (
        "org.fedoraproject.prod.openscanhub.task.started",
        callbacks::openscanhub_task_started,
    ),
    (
        "org.fedoraproject.prod.openscanhub.task.finished",
        callbacks::openscanhub_task_finished,
    ),
];

/// Topics the relay understands, in table order. Exposed so the deployment
/// subscription config can be checked against the code.
pub const SUPPORTED_TOPICS: [&str; 17] = [
    "org.fedoraproject.prod.copr.build.end",
    "org.fedoraproject.prod.copr.build.start",
    "org.fedoraproject.prod.buildsys.task.state.change",
    "org.fedoraproject.prod.buildsys.build.state.change",
    "org.fedoraproject.prod.buildsys.tag",
    "org.fedoraproject.prod.pagure.git.receive",
    "org.fedoraproject.prod.pagure.pull-request.new",
    "org.fedoraproject.prod.pagure.pull-request.updated",
    "org.fedoraproject.prod.pagure.pull-request.rebased",
    "org.fedoraproject.prod.pagure.pull-request.flag.added",
    "org.fedoraproject.prod.pagure.pull-request.flag.updated",
    "org.fedoraproject.prod.pagure.pull-request.comment.added",
    "org.fedoraproject.prod.pagure.pull-request.closed",
    "org.fedoraproject.prod.hotness.update.bug.file",
    "org.release-monitoring.prod.anitya.project.version.update.v2",
    "org.fedoraproject.prod.openscanhub.task.started",
    "org.fedoraproject.prod.openscanhub.task.finished",
];

/// Exact-match lookup; `None` for unrecognized topics. The caller applies
/// the fallback so the "unknown topic never crashes" guarantee lives in one
/// place instead of a magic default baked into the table.
pub fn lookup(topic: &str) -> Option<Callback> {
    TABLE
        .iter()
        .find(|(known, _)| *known == topic)
        .map(|(_, callback)| *callback)
}
