//! Violation and plan loaders.
//!
//! Both inputs are plain JSON documents produced by external tools
//! (`opa eval --format json` and `terraform show -json`). A missing file is
//! not an error for the run: it is replaced by an empty object.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::InputError;

/// Resource type used when a violation names a resource absent from the plan.
pub const UNKNOWN_TYPE: &str = "unknown_type";

/// Reads and decodes a JSON document.
///
/// # Errors
/// - [`InputError::Missing`] if the file does not exist
/// - [`InputError::Io`] for any other read failure
/// - [`InputError::Json`] if the content is not valid JSON
pub fn load_json(path: &Path) -> Result<Value, InputError> {
    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            InputError::Missing(path.to_path_buf())
        } else {
            InputError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&raw).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`load_json`], but a missing file yields an empty object.
///
/// # Errors
/// Read and decode failures other than "not found" are returned unchanged.
pub fn load_json_or_empty(path: &Path) -> Result<Value, InputError> {
    match load_json(path) {
        Err(e @ InputError::Missing(_)) => {
            warn!(error = %e, "using an empty document instead");
            Ok(Value::Object(Map::new()))
        }
        other => other,
    }
}

/// One entry of the plan's `resource_changes`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanResourceChange {
    #[serde(default)]
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
}

/// `name → type` lookup derived from a plan.
///
/// Names are not unique across resource types; a later change with the same
/// name replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct PlanIndex {
    types: HashMap<String, String>,
}

impl PlanIndex {
    /// Builds the index from a plan document. Entries that do not carry a
    /// string `type` and `name` are skipped.
    pub fn from_plan(plan: &Value) -> Self {
        let mut types = HashMap::new();

        let Some(changes) = plan.get("resource_changes").and_then(Value::as_array) else {
            debug!("plan has no resource_changes");
            return Self { types };
        };

        for (idx, raw) in changes.iter().enumerate() {
            match PlanResourceChange::deserialize(raw) {
                Ok(change) => {
                    if let Some(prev) = types.insert(change.name.clone(), change.resource_type) {
                        debug!(
                            name = %change.name,
                            previous = %prev,
                            address = %change.address,
                            "duplicate resource name in plan, keeping the later type"
                        );
                    }
                }
                Err(e) => debug!(idx, error = %e, "skipping malformed resource change"),
            }
        }

        Self { types }
    }

    /// Resource type for `name`, or [`UNKNOWN_TYPE`].
    pub fn resource_type(&self, name: &str) -> &str {
        self.types.get(name).map(String::as_str).unwrap_or(UNKNOWN_TYPE)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_file_becomes_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(load_json(&path), Err(InputError::Missing(_))));
        assert_eq!(load_json_or_empty(&path).unwrap(), json!({}));
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_json_or_empty(&path),
            Err(InputError::Json { .. })
        ));
    }

    #[test]
    fn plan_index_maps_names_to_types() {
        let plan = json!({
            "resource_changes": [
                { "address": "google_storage_bucket.b1", "type": "google_storage_bucket", "name": "b1" },
                { "address": "google_compute_instance.vm", "type": "google_compute_instance", "name": "vm" },
                { "address": "broken" }
            ]
        });
        let idx = PlanIndex::from_plan(&plan);

        assert_eq!(idx.len(), 2);
        assert_eq!(idx.resource_type("b1"), "google_storage_bucket");
        assert_eq!(idx.resource_type("vm"), "google_compute_instance");
        assert_eq!(idx.resource_type("nope"), UNKNOWN_TYPE);
    }

    #[test]
    fn plan_without_changes_is_empty() {
        assert!(PlanIndex::from_plan(&json!({})).is_empty());
        assert!(PlanIndex::from_plan(&json!({ "resource_changes": "x" })).is_empty());
    }

    // Known limitation: names are not unique across types, the last change wins.
    #[test]
    fn duplicate_names_keep_the_last_type() {
        let plan = json!({
            "resource_changes": [
                { "address": "google_storage_bucket.shared", "type": "google_storage_bucket", "name": "shared" },
                { "address": "google_pubsub_topic.shared", "type": "google_pubsub_topic", "name": "shared" }
            ]
        });
        let idx = PlanIndex::from_plan(&plan);

        assert_eq!(idx.len(), 1);
        assert_eq!(idx.resource_type("shared"), "google_pubsub_topic");
    }
}
