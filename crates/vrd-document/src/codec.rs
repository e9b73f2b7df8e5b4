//! JSON encoding seam with strict-mode structural pre-validation.
//!
//! In strict mode every structural problem in the raw value is collected
//! before the typed parse is attempted, so a malformed input yields one
//! aggregated report instead of the first serde failure. Permissive mode
//! skips the walk and lets the typed parse judge the input.

use serde_json::Value;
use uuid::Uuid;

use vrd_core::ResourceGraph;

use crate::error::DocumentError;

const KNOWN_RESOURCE_TYPES: &[&str] = &[
    "Composition",
    "Patient",
    "Practitioner",
    "Procedure",
    "Observation",
    "Condition",
    "RelatedPerson",
    "Location",
    "Organization",
    "List",
];

/// Serialize a graph to JSON bytes.
pub fn to_json(graph: &ResourceGraph) -> Result<Vec<u8>, DocumentError> {
    serde_json::to_vec_pretty(graph).map_err(|e| DocumentError::Serialization(e.to_string()))
}

/// Deserialize a graph from JSON bytes.
///
/// With `permissive = false`, the structural pre-validation walk runs first
/// and aggregates every problem it finds.
pub fn from_json(bytes: &[u8], permissive: bool) -> Result<ResourceGraph, DocumentError> {
    if !permissive {
        prevalidate(bytes)?;
    }
    serde_json::from_slice(bytes).map_err(|e| DocumentError::Parse(e.to_string()))
}

fn prevalidate(bytes: &[u8]) -> Result<(), DocumentError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| DocumentError::Parse(e.to_string()))?;

    let mut problems = Vec::new();
    let Some(root) = value.as_object() else {
        return Err(DocumentError::Validation(vec![
            "document root is not an object".to_string(),
        ]));
    };

    match root.get("kind").and_then(Value::as_str) {
        Some("document") | Some("collection") => {}
        Some(other) => problems.push(format!("unknown graph kind `{other}`")),
        None => problems.push("graph kind is missing".to_string()),
    }

    match root.get("id").and_then(Value::as_str) {
        Some(id) if Uuid::parse_str(id).is_ok() => {}
        Some(id) => problems.push(format!("graph id `{id}` is not a uuid")),
        None => problems.push("graph id is missing".to_string()),
    }

    match root.get("entries") {
        None => {}
        Some(Value::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                check_entry(index, entry, &mut problems);
            }
        }
        Some(_) => problems.push("entries is not an array".to_string()),
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(DocumentError::Validation(problems))
    }
}

fn check_entry(index: usize, entry: &Value, problems: &mut Vec<String>) {
    let Some(entry) = entry.as_object() else {
        problems.push(format!("entry {index} is not an object"));
        return;
    };
    if entry.get("full_url").and_then(Value::as_str).is_none() {
        problems.push(format!("entry {index} has no full_url"));
    }
    let Some(resource) = entry.get("resource").and_then(Value::as_object) else {
        problems.push(format!("entry {index} has no resource"));
        return;
    };
    match resource.get("resourceType").and_then(Value::as_str) {
        Some(t) if KNOWN_RESOURCE_TYPES.contains(&t) => {}
        Some(t) => problems.push(format!("entry {index} has unknown resourceType `{t}`")),
        None => problems.push(format!("entry {index} resource has no resourceType")),
    }
    match resource.get("id").and_then(Value::as_str) {
        Some(id) if Uuid::parse_str(id).is_ok() => {}
        Some(id) => problems.push(format!("entry {index} resource id `{id}` is not a uuid")),
        None => problems.push(format!("entry {index} resource has no id")),
    }
}
