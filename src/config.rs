//! Input locations. Defaults are relative to the front-end repo root, which is
//! taken from `--root`, then `MACHINE_CENSUS_ROOT`, then the working directory.

use std::env;
use std::path::{Path, PathBuf};

use crate::sources::SourceKind;

pub const DEFAULT_SERVICE_PATH: &str = "src/lib/mockMachineService.ts";
pub const DEFAULT_INVENTORY_PATH: &str = "mock_machines.json";
pub const DEFAULT_DEMO_PATH: &str = "src/lib/demoData.ts";
pub const ROOT_ENV_VAR: &str = "MACHINE_CENSUS_ROOT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub service: PathBuf,
    pub inventory: PathBuf,
    pub demo: PathBuf,
}

impl SourcePaths {
    /// Default layout under `root`.
    pub fn under(root: &Path) -> Self {
        Self {
            service: root.join(DEFAULT_SERVICE_PATH),
            inventory: root.join(DEFAULT_INVENTORY_PATH),
            demo: root.join(DEFAULT_DEMO_PATH),
        }
    }

    /// Default layout under the root named by `explicit_root`, falling back to
    /// `MACHINE_CENSUS_ROOT` and then the current directory.
    pub fn resolve(explicit_root: Option<&str>) -> Self {
        let root = explicit_root
            .map(PathBuf::from)
            .or_else(|| env::var(ROOT_ENV_VAR).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::under(&root)
    }

    pub fn path_for(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Service => &self.service,
            SourceKind::Inventory => &self.inventory,
            SourceKind::Demo => &self.demo,
        }
    }

    pub fn set_path(&mut self, kind: SourceKind, path: impl Into<PathBuf>) {
        let slot = match kind {
            SourceKind::Service => &mut self.service,
            SourceKind::Inventory => &mut self.inventory,
            SourceKind::Demo => &mut self.demo,
        };
        *slot = path.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_joins_default_layout() {
        let paths = SourcePaths::under(Path::new("/srv/app"));
        assert_eq!(paths.service, Path::new("/srv/app/src/lib/mockMachineService.ts"));
        assert_eq!(paths.inventory, Path::new("/srv/app/mock_machines.json"));
        assert_eq!(paths.demo, Path::new("/srv/app/src/lib/demoData.ts"));
    }

    #[test]
    fn explicit_root_wins() {
        let paths = SourcePaths::resolve(Some("fixtures"));
        assert_eq!(paths.inventory, Path::new("fixtures/mock_machines.json"));
    }

    #[test]
    fn set_path_overrides_single_source() {
        let mut paths = SourcePaths::under(Path::new("."));
        paths.set_path(SourceKind::Demo, "elsewhere/demo.ts");
        assert_eq!(paths.path_for(SourceKind::Demo), Path::new("elsewhere/demo.ts"));
        assert_eq!(paths.path_for(SourceKind::Service), Path::new("./src/lib/mockMachineService.ts"));
    }
}
