//! Census runs: read every input the command needs up front, then extract,
//! reconcile and tally. Any read or decode failure aborts before a report is
//! built.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SourcePaths;
use crate::error::{CensusError, Result};
use crate::reconcile::{reconcile, ReconciledSet, MERGE_ORDER};
use crate::report::{CategoryReport, CountReport};
use crate::sources::{SourceBatch, SourceKind};
use crate::tally::{count_prefixed_ids, tally_field, GROUP_FIELD, MACHINE_ID_PREFIX, SUB_GROUP_FIELD};

/// A fully-buffered input file.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub text: String,
}

impl LoadedSource {
    pub fn extract(&self) -> Result<SourceBatch> {
        self.kind.extract(&self.path, &self.text)
    }
}

pub fn read_source(kind: SourceKind, path: &Path) -> Result<LoadedSource> {
    let text = fs::read_to_string(path).map_err(|source| CensusError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(source = %kind, path = %path.display(), bytes = text.len(), "read source");
    Ok(LoadedSource {
        kind,
        path: path.to_path_buf(),
        text,
    })
}

/// Read all three sources, in merge order.
pub fn load_sources(paths: &SourcePaths) -> Result<Vec<LoadedSource>> {
    MERGE_ORDER
        .iter()
        .map(|kind| read_source(*kind, paths.path_for(*kind)))
        .collect()
}

/// Extract and reconcile already-loaded sources.
pub fn reconcile_sources(sources: &[LoadedSource]) -> Result<ReconciledSet> {
    let batches = sources
        .iter()
        .map(LoadedSource::extract)
        .collect::<Result<Vec<_>>>()?;
    Ok(reconcile(&batches))
}

pub fn run_count(paths: &SourcePaths) -> Result<CountReport> {
    let sources = load_sources(paths)?;
    let set = reconcile_sources(&sources)?;
    Ok(CountReport::from_set(&set))
}

/// Category breakdown of the service source text alone.
pub fn categorize(text: &str) -> Result<CategoryReport> {
    Ok(CategoryReport::new(
        count_prefixed_ids(text, MACHINE_ID_PREFIX)?,
        tally_field(text, SUB_GROUP_FIELD)?,
        tally_field(text, GROUP_FIELD)?,
    ))
}

pub fn run_categories(paths: &SourcePaths) -> Result<CategoryReport> {
    let service = read_source(SourceKind::Service, paths.path_for(SourceKind::Service))?;
    categorize(&service.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(kind: SourceKind, text: &str) -> LoadedSource {
        LoadedSource {
            kind,
            path: PathBuf::from(kind.as_str()),
            text: text.to_string(),
        }
    }

    fn service_text(body: &str) -> String {
        format!("const INITIAL_MACHINES: any[] = [\n{body}\n];\n")
    }

    #[test]
    fn inventory_name_wins_over_service() {
        let sources = [
            loaded(SourceKind::Demo, ""),
            loaded(SourceKind::Service, &service_text(r#"{ "name": "Press-1-old", "assetTag": "T1" }"#)),
            loaded(SourceKind::Inventory, r#"[{"tag": "T1", "name": "Press-1"}]"#),
        ];
        let set = reconcile_sources(&sources).expect("reconcile");
        assert_eq!(set.len(), 1);
        assert_eq!(set.name_of("T1"), Some("Press-1"));
    }

    #[test]
    fn service_only_keeps_captured_names() {
        let sources = [
            loaded(SourceKind::Demo, ""),
            loaded(
                SourceKind::Service,
                &service_text(
                    r#"{ "name": "Lathe", "assetTag": "T1" }, { "name": "Mill", "assetTag": "T2" }"#,
                ),
            ),
            loaded(SourceKind::Inventory, "[]"),
        ];
        let set = reconcile_sources(&sources).expect("reconcile");
        assert_eq!(set.len(), 2);
        assert_eq!(set.name_of("T1"), Some("Lathe"));
        assert_eq!(set.name_of("T2"), Some("Mill"));
    }

    #[test]
    fn empty_demo_equals_service_plus_inventory() {
        let service = service_text(r#"{ "name": "S", "assetTag": "S1" }"#);
        let inventory = r#"[{"assetTag": "I1", "name": "I"}]"#;
        let with_empty_demo = reconcile_sources(&[
            loaded(SourceKind::Demo, "export const DEMO_MACHINES = [];"),
            loaded(SourceKind::Service, &service),
            loaded(SourceKind::Inventory, inventory),
        ])
        .expect("reconcile");
        let without_demo = reconcile_sources(&[
            loaded(SourceKind::Service, &service),
            loaded(SourceKind::Inventory, inventory),
        ])
        .expect("reconcile");
        let names = |set: &ReconciledSet| {
            set.iter()
                .map(|(k, e)| (k.to_string(), e.display_name.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&with_empty_demo), names(&without_demo));
    }

    #[test]
    fn decode_error_aborts_reconciliation() {
        let result = reconcile_sources(&[loaded(SourceKind::Inventory, "not json")]);
        assert!(matches!(result, Err(CensusError::Decode { .. })));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_source(SourceKind::Demo, Path::new("/definitely/not/here.ts")).expect_err("missing");
        assert!(matches!(err, CensusError::Read { .. }));
    }

    #[test]
    fn categorize_counts_independently_of_identity() {
        let text = service_text(
            r#"{ "id": "mac_1", "name": "A", "assetTag": "T1", "group": "Metal", "subGroup": "CNC" },
               { "id": "mac_2", "name": "B", "assetTag": "T1", "group": "Metal", "subGroup": "CNC" },
               { "id": "mac_3", "name": "C", "assetTag": "T2", "group": "Metal", "subGroup": "CNC" },
               { "id": "mac_4", "name": "D", "assetTag": "T3", "group": "Wood", "subGroup": "Manual" }"#,
        );
        let report = categorize(&text).expect("categorize");
        assert_eq!(report.machine_ids, 4);
        assert_eq!(report.sub_groups.get("CNC"), 3);
        assert_eq!(report.sub_groups.get("Manual"), 1);
        assert_eq!(report.groups.get("Metal"), 3);
    }
}
