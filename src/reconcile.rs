//! Merge of the per-source record batches into one deduplicated set.
//!
//! Sources are applied in [`MERGE_ORDER`] by plain assignment, so the last
//! source to write a key wins. Keys compare by exact string equality.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::sources::{MachineRecord, SourceBatch, SourceKind};

/// Lowest precedence first: inventory overwrites service, which overwrites demo.
pub const MERGE_ORDER: [SourceKind; 3] = [SourceKind::Demo, SourceKind::Service, SourceKind::Inventory];

/// Position of `kind` in [`MERGE_ORDER`]; higher wins.
pub fn precedence(kind: SourceKind) -> usize {
    MERGE_ORDER
        .iter()
        .position(|candidate| *candidate == kind)
        .unwrap_or(MERGE_ORDER.len())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledEntry {
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub source: SourceKind,
}

/// A key that was written more than once during the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub identity_key: String,
    pub previous_source: SourceKind,
    pub previous_name: Option<String>,
    pub winning_source: SourceKind,
    pub winning_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub source: SourceKind,
    pub extracted: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledSet {
    entries: BTreeMap<String, ReconciledEntry>,
    collisions: Vec<Collision>,
    stats: Vec<SourceStats>,
}

impl ReconciledSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identity_key: &str) -> Option<&ReconciledEntry> {
        self.entries.get(identity_key)
    }

    /// Display name for `identity_key`; `None` when the key is absent or the
    /// winning record had no name.
    pub fn name_of(&self, identity_key: &str) -> Option<&str> {
        self.entries.get(identity_key)?.display_name.as_deref()
    }

    /// Entries sorted by identity key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReconciledEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Per-source extraction counts, in merge order.
    pub fn stats(&self) -> &[SourceStats] {
        &self.stats
    }

    /// Total records fed into the merge across all sources.
    pub fn total_extracted(&self) -> usize {
        self.stats.iter().map(|s| s.extracted).sum()
    }

    fn assign(&mut self, kind: SourceKind, record: &MachineRecord) {
        let entry = ReconciledEntry {
            display_name: record.display_name.clone(),
            category: record.category.clone(),
            source: kind,
        };
        if let Some(previous) = self.entries.insert(record.identity_key.clone(), entry) {
            self.collisions.push(Collision {
                identity_key: record.identity_key.clone(),
                previous_source: previous.source,
                previous_name: previous.display_name,
                winning_source: kind,
                winning_name: record.display_name.clone(),
            });
        }
    }
}

/// Fold `batches` into a [`ReconciledSet`]. Batches are applied in
/// [`MERGE_ORDER`] whatever order they arrive in; within a batch, later
/// records overwrite earlier ones.
pub fn reconcile(batches: &[SourceBatch]) -> ReconciledSet {
    let mut ordered: Vec<&SourceBatch> = batches.iter().collect();
    ordered.sort_by_key(|batch| precedence(batch.kind));

    let mut set = ReconciledSet::default();
    for batch in ordered {
        for record in &batch.records {
            set.assign(batch.kind, record);
        }
        set.stats.push(SourceStats {
            source: batch.kind,
            extracted: batch.records.len(),
            dropped: batch.dropped,
        });
        if batch.records.is_empty() {
            tracing::warn!(source = %batch.kind, "source contributed no machine records");
        } else {
            tracing::info!(source = %batch.kind, records = batch.records.len(), "merged source");
        }
    }

    tracing::info!(
        total = set.len(),
        extracted = set.total_extracted(),
        collisions = set.collisions.len(),
        "reconciliation complete"
    );
    set
}
