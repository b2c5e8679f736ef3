//! Spec-file change inspection for push-like events.

use serde_json::Value;

use crate::classify::access::nested_get;

/// Does the change-set in `body` touch a spec file?
///
/// Two body shapes are in the wild: the full stats tree at
/// `commit.stats.files` and the flat `changed_files` mapping. In both, the
/// changed file names are the keys of the mapping. Returns `false` when
/// neither shape is present or the file set is empty.
pub fn specfile_changed(body: &Value) -> bool {
    let stats_files = nested_get(body, &["commit", "stats", "files"]);
    let flat_files = nested_get(body, &["changed_files"]);

    [stats_files, flat_files]
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .flat_map(|files| files.keys())
        .any(|file_name| file_name.ends_with(".spec"))
}
