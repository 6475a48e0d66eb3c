//! Remote record mapping
//!
//! The remote-data collaborator delivers raw JSON records plus the field paths
//! that locate label and value. Records are mapped to choice specs here;
//! malformed records (no usable value) are skipped and counted, never fatal.
//! A missing label falls back to the value text, and remaining top-level
//! primitive fields become custom properties.

use crate::store::ChoiceSpec;
use serde_json::{Map, Value};

/// A batch of records from the remote-data collaborator
#[derive(Debug, Clone)]
pub struct RemoteBatch {
    /// Dotted path to the label field inside each record
    pub label_field: String,

    /// Dotted path to the value field inside each record
    pub value_field: String,

    /// Raw records as fetched
    pub records: Vec<Value>,
}

impl RemoteBatch {
    /// Create a batch with the given field paths
    #[must_use]
    pub fn new(
        label_field: impl Into<String>,
        value_field: impl Into<String>,
        records: Vec<Value>,
    ) -> Self {
        Self {
            label_field: label_field.into(),
            value_field: value_field.into(),
            records,
        }
    }
}

/// What happened to a completed load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The batch was applied
    Applied(LoadReport),

    /// A newer load superseded this one; the batch was dropped
    Stale,
}

/// Counts from an applied batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Choices appended to the store
    pub added: usize,

    /// Records skipped for lack of a usable value
    pub skipped: usize,
}

/// Proof of the load generation a pending request belongs to
///
/// Tokens from superseded requests resolve to [`LoadOutcome::Stale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "pass the token back to complete_load"]
pub struct LoadToken {
    pub(crate) generation: u64,
}

/// Map a batch to choice specs, counting skipped records
pub(crate) fn map_records(batch: &RemoteBatch) -> (Vec<ChoiceSpec>, usize) {
    let mut specs = Vec::with_capacity(batch.records.len());
    let mut skipped = 0;

    for record in &batch.records {
        let Some(value) = field(record, &batch.value_field).and_then(text) else {
            skipped += 1;
            continue;
        };
        let label = field(record, &batch.label_field)
            .and_then(text)
            .unwrap_or_else(|| value.clone());

        let custom = custom_properties(record, &batch.label_field, &batch.value_field);
        specs.push(ChoiceSpec::new(label, value).with_custom(custom));
    }

    (specs, skipped)
}

/// Follow a dotted path into a record
fn field<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Usable text of a leaf value; blank strings are not usable
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Top-level primitive fields that are not part of the label/value paths
fn custom_properties(record: &Value, label_field: &str, value_field: &str) -> Map<String, Value> {
    let label_head = label_field.split('.').next().unwrap_or(label_field);
    let value_head = value_field.split('.').next().unwrap_or(value_field);

    let mut custom = Map::new();
    if let Some(object) = record.as_object() {
        for (key, value) in object {
            if key == label_head || key == value_head {
                continue;
            }
            if matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
                custom.insert(key.clone(), value.clone());
            }
        }
    }
    custom
}
