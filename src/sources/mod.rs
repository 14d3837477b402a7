//! Machine record extraction from the three mock-data sources.
//!
//! Each source has its own shape, so each gets its own extractor; all of them
//! normalize to [`MachineRecord`] and never fail on a pattern miss.

mod demo;
mod inventory;
mod service;

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

pub use demo::extract_demo_records;
pub use inventory::extract_inventory_records;
pub use service::{extract_service_records, service_block, SERVICE_ARRAY_MARKER, SERVICE_END_SENTINEL};

/// One machine as it appears in a single source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineRecord {
    pub identity_key: String,
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl MachineRecord {
    pub fn new(identity_key: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            identity_key: identity_key.into(),
            display_name,
            category: None,
        }
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// `demoData.ts`: loose `name: "..", ... tag: ".."` literals.
    Demo,
    /// `mockMachineService.ts`: the embedded `INITIAL_MACHINES` array.
    Service,
    /// `mock_machines.json`.
    Inventory,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Service => "service",
            Self::Inventory => "inventory",
        }
    }

    /// Run this source's extractor over already-buffered text. `path` is only
    /// used for diagnostics.
    pub fn extract(&self, path: &Path, text: &str) -> Result<SourceBatch> {
        match self {
            Self::Demo => Ok(SourceBatch::new(*self, extract_demo_records(text)?)),
            Self::Service => Ok(SourceBatch::new(*self, extract_service_records(text)?)),
            Self::Inventory => extract_inventory_records(path, text),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Records extracted from one source, plus how many candidates were dropped
/// for lacking an identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBatch {
    pub kind: SourceKind,
    pub records: Vec<MachineRecord>,
    pub dropped: usize,
}

impl SourceBatch {
    pub fn new(kind: SourceKind, records: Vec<MachineRecord>) -> Self {
        Self {
            kind,
            records,
            dropped: 0,
        }
    }

    pub fn with_dropped(mut self, dropped: usize) -> Self {
        self.dropped = dropped;
        self
    }
}
