//! Source B: `mock_machines.json`, a plain array of machine objects.

use std::path::Path;

use serde_json::{Map, Value};

use super::{MachineRecord, SourceBatch, SourceKind};
use crate::error::{CensusError, Result};

pub fn extract_inventory_records(path: &Path, text: &str) -> Result<SourceBatch> {
    let payload: Value = serde_json::from_str(text).map_err(|source| CensusError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = match payload {
        Value::Array(entries) => entries,
        other => {
            return Err(CensusError::UnexpectedShape {
                path: path.to_path_buf(),
                found: value_kind(&other),
            })
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut dropped = 0usize;
    for (index, entry) in entries.iter().enumerate() {
        let Some(object) = entry.as_object() else {
            tracing::warn!(index, found = value_kind(entry), "skipping non-object inventory entry");
            dropped += 1;
            continue;
        };
        match identity_key(object) {
            Some(key) => records.push(MachineRecord::new(key, string_field(object, "name"))),
            None => dropped += 1,
        }
    }

    tracing::debug!(count = records.len(), dropped, "extracted inventory records");
    Ok(SourceBatch::new(SourceKind::Inventory, records).with_dropped(dropped))
}

/// `tag` when present and non-empty, otherwise `assetTag`.
fn identity_key(object: &Map<String, Value>) -> Option<String> {
    string_field(object, "tag")
        .filter(|tag| !tag.is_empty())
        .or_else(|| string_field(object, "assetTag"))
        .filter(|tag| !tag.is_empty())
}

/// Only JSON strings count; numbers and other values are treated as absent.
fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key)?.as_str().map(str::to_string)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
