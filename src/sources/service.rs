//! Source A: the `INITIAL_MACHINES` array literal embedded in
//! `mockMachineService.ts`.

use regex::Regex;

use super::MachineRecord;
use crate::error::Result;

pub const SERVICE_ARRAY_MARKER: &str = "INITIAL_MACHINES: any[] = [";
pub const SERVICE_END_SENTINEL: &str = "// Spread migrated machines";
const ARRAY_CLOSE: &str = "];";

/// Adjacent `"name"` then `"assetTag"` pair. Objects that order these fields
/// differently, or put anything between them, are not matched.
const NAME_TAG_PATTERN: &str = r#""name":\s*"([^"]+)",\s*"assetTag":\s*"([^"]+)""#;
const SUB_GROUP_PATTERN: &str = r#""subGroup":\s*"([^"]+)""#;

/// Slice of `text` from the array marker up to whichever of the sentinel
/// comment or the closing `];` comes first. Empty when the marker is absent;
/// runs to the end of the text when neither terminator is found.
pub fn service_block(text: &str) -> &str {
    let Some(start) = text.find(SERVICE_ARRAY_MARKER) else {
        return "";
    };
    let rest = &text[start..];
    let end = [SERVICE_END_SENTINEL, ARRAY_CLOSE]
        .iter()
        .filter_map(|token| rest.find(token))
        .min()
        .unwrap_or(rest.len());
    &rest[..end]
}

pub fn extract_service_records(text: &str) -> Result<Vec<MachineRecord>> {
    let block = service_block(text);
    if block.is_empty() {
        tracing::warn!(marker = SERVICE_ARRAY_MARKER, "service array marker not found");
        return Ok(Vec::new());
    }

    let pair = Regex::new(NAME_TAG_PATTERN)?;
    let sub_group = Regex::new(SUB_GROUP_PATTERN)?;

    let matches: Vec<_> = pair.captures_iter(block).collect();
    let mut records = Vec::with_capacity(matches.len());
    for (index, caps) in matches.iter().enumerate() {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let name = caps.get(1).map(|m| m.as_str().to_string());
        let Some(tag) = caps.get(2) else { continue };

        // The subGroup, if any, has to sit after this pair and before the next one.
        let window_end = matches
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map_or(block.len(), |m| m.start());
        let category = sub_group
            .captures(&block[whole.end..window_end])
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        records.push(MachineRecord::new(tag.as_str(), name).with_category(category));
    }

    tracing::debug!(count = records.len(), "extracted service records");
    Ok(records)
}
