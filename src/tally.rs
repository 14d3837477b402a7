//! Category breakdown over the raw service source text. This pass never
//! looks at the reconciled set, so machines that collide across sources are
//! still counted here once per occurrence.

use std::collections::HashMap;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::Result;

/// Fine-grained category field.
pub const SUB_GROUP_FIELD: &str = "subGroup";
/// Coarse-grained category field.
pub const GROUP_FIELD: &str = "group";
/// Prefix of machine ids, as opposed to slot or stock ids.
pub const MACHINE_ID_PREFIX: &str = "mac_";

/// Label counts in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTally {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl CategoryTally {
    pub fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.counts.len());
                self.counts.push((label.to_string(), 1));
            }
        }
    }

    pub fn get(&self, label: &str) -> usize {
        self.index.get(label).map_or(0, |&slot| self.counts[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

impl<'a> FromIterator<&'a str> for CategoryTally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(labels: I) -> Self {
        let mut tally = Self::default();
        for label in labels {
            tally.add(label);
        }
        tally
    }
}

impl Serialize for CategoryTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (label, count) in &self.counts {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

/// Count every `"<field>": "<label>"` occurrence in `text`.
pub fn tally_field(text: &str, field: &str) -> Result<CategoryTally> {
    let pattern = Regex::new(&format!(r#""{}":\s*"([^"]+)""#, regex::escape(field)))?;
    Ok(pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect())
}

/// Number of `"id": "<prefix>..."` occurrences in `text`.
pub fn count_prefixed_ids(text: &str, prefix: &str) -> Result<usize> {
    let pattern = Regex::new(&format!(r#""id":\s*"{}([^"]+)""#, regex::escape(prefix)))?;
    Ok(pattern.find_iter(text).count())
}
