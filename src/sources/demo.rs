//! Source C: `demoData.ts`, unquoted-key object literals where `name` and
//! `tag` may be separated by any amount of other content.

use regex::Regex;

use super::MachineRecord;
use crate::error::Result;

/// Lazy and dot-matches-newline: each `name:` pairs with the nearest `tag:`
/// after it, even across lines and nested objects.
const NAME_THEN_TAG_PATTERN: &str = r#"(?s)name:\s*"([^"]+)",.*?tag:\s*"([^"]+)""#;

pub fn extract_demo_records(text: &str) -> Result<Vec<MachineRecord>> {
    let pattern = Regex::new(NAME_THEN_TAG_PATTERN)?;
    let records: Vec<_> = pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let tag = caps.get(2)?;
            let name = caps.get(1).map(|m| m.as_str().to_string());
            Some(MachineRecord::new(tag.as_str(), name))
        })
        .collect();

    tracing::debug!(count = records.len(), "extracted demo records");
    Ok(records)
}
