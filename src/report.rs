//! Report documents and their text / JSON / CSV renderings.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{CensusError, Result};
use crate::reconcile::{Collision, ReconciledSet, SourceStats};
use crate::tally::CategoryTally;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineLine {
    pub tag: String,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountReport {
    pub generated_at: String,
    pub total: usize,
    pub machines: Vec<MachineLine>,
    pub sources: Vec<SourceStats>,
    pub collisions: Vec<Collision>,
}

impl CountReport {
    pub fn from_set(set: &ReconciledSet) -> Self {
        let machines = set
            .iter()
            .map(|(tag, entry)| MachineLine {
                tag: tag.to_string(),
                name: entry.display_name.clone(),
                category: entry.category.clone(),
            })
            .collect();
        Self {
            generated_at: timestamp(),
            total: set.len(),
            machines,
            sources: set.stats().to_vec(),
            collisions: set.collisions().to_vec(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = format!("Total Unique Hardcoded Machines: {}\n", self.total);
        for machine in &self.machines {
            out.push_str(&format!(
                "Tag: {} - Name: {}\n",
                machine.tag,
                machine.name.as_deref().unwrap_or("None")
            ));
        }
        out
    }

    pub fn render_json(&self) -> Result<String> {
        to_pretty_json(self)
    }

    pub fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["tag", "name"])?;
        for machine in &self.machines {
            writer.write_record([machine.tag.as_str(), machine.name.as_deref().unwrap_or("")])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| CensusError::Render(err.to_string()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub generated_at: String,
    /// Raw count of `mac_`-prefixed ids, duplicates included.
    pub machine_ids: usize,
    pub sub_groups: CategoryTally,
    pub groups: CategoryTally,
}

impl CategoryReport {
    pub fn new(machine_ids: usize, sub_groups: CategoryTally, groups: CategoryTally) -> Self {
        Self {
            generated_at: timestamp(),
            machine_ids,
            sub_groups,
            groups,
        }
    }

    pub fn render_text(&self) -> String {
        let mut lines = vec![format!("Total Machines (mac_ prefix): {}", self.machine_ids)];
        lines.push("\nCategories (subGroup):".to_string());
        lines.extend(tally_lines(&self.sub_groups));
        lines.push("\nMain Groups:".to_string());
        lines.extend(tally_lines(&self.groups));
        lines.iter().map(|line| format!("{line}\n")).collect()
    }

    pub fn render_json(&self) -> Result<String> {
        to_pretty_json(self)
    }
}

fn tally_lines(tally: &CategoryTally) -> impl Iterator<Item = String> + '_ {
    tally.iter().map(|(label, count)| format!("- {label}: {count}"))
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| CensusError::Render(err.to_string()))
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use crate::sources::{MachineRecord, SourceBatch, SourceKind};

    fn sample_set() -> ReconciledSet {
        reconcile(&[
            SourceBatch::new(
                SourceKind::Service,
                vec![
                    MachineRecord::new("T2", Some("Mill, large".into())),
                    MachineRecord::new("T1", Some("Old".into())),
                ],
            ),
            SourceBatch::new(
                SourceKind::Inventory,
                vec![MachineRecord::new("T1", Some("Press".into())), MachineRecord::new("T3", None)],
            ),
        ])
    }

    #[test]
    fn text_lists_sorted_tags() {
        let text = CountReport::from_set(&sample_set()).render_text();
        assert_eq!(
            text,
            "Total Unique Hardcoded Machines: 3\n\
             Tag: T1 - Name: Press\n\
             Tag: T2 - Name: Mill, large\n\
             Tag: T3 - Name: None\n"
        );
    }

    #[test]
    fn json_carries_sources_and_collisions() {
        let json = CountReport::from_set(&sample_set()).render_json().expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["total"], 3);
        assert_eq!(value["machines"][0]["tag"], "T1");
        assert_eq!(value["sources"][0]["source"], "service");
        assert_eq!(value["sources"][1]["extracted"], 2);
        assert_eq!(value["collisions"][0]["winning_source"], "inventory");
        assert!(value["generated_at"].as_str().is_some_and(|s| s.ends_with('Z')));
    }

    #[test]
    fn csv_quotes_embedded_commas() {
        let csv = CountReport::from_set(&sample_set()).render_csv().expect("csv");
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines, vec!["tag,name", "T1,Press", "T2,\"Mill, large\"", "T3,"]);
    }

    #[test]
    fn json_failure_is_a_render_error() {
        struct Broken;
        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("unserializable"))
            }
        }
        let err = to_pretty_json(&Broken).expect_err("should fail");
        assert!(matches!(err, CensusError::Render(ref msg) if msg.contains("unserializable")));
    }

    #[test]
    fn category_text_with_empty_tallies() {
        let report = CategoryReport::new(0, CategoryTally::default(), CategoryTally::default());
        assert_eq!(
            report.render_text(),
            "Total Machines (mac_ prefix): 0\n\nCategories (subGroup):\n\nMain Groups:\n"
        );
    }

    #[test]
    fn category_text_layout() {
        let report = CategoryReport::new(
            4,
            ["CNC", "CNC", "Manual", "CNC"].into_iter().collect(),
            ["Metal"].into_iter().collect(),
        );
        assert_eq!(
            report.render_text(),
            "Total Machines (mac_ prefix): 4\n\nCategories (subGroup):\n- CNC: 3\n- Manual: 1\n\nMain Groups:\n- Metal: 1\n"
        );
    }
}
