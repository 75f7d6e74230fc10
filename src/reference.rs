//! Reference tables: cohort percentiles and coaching tips.
//!
//! Tables are validated once at load and then shared read-only. A reload
//! builds a complete new [`ReferenceTables`] and swaps the `Arc`, so an
//! analysis that already holds a snapshot keeps seeing the old tables whole.

use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use once_cell::sync::OnceCell;

use crate::benchmark::CohortTable;
use crate::coaching::{TipsFile, TipsTable};
use crate::error::{AnalysisError, Result};

const BUILTIN_COHORTS: &str = include_str!("../data/benchmarks.json");
const BUILTIN_TIPS: &str = include_str!("../data/tips.json");

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTables {
    cohorts: CohortTable,
    tips: TipsTable,
}

impl ReferenceTables {
    pub fn new(cohorts: CohortTable, tips: TipsTable) -> Result<Self> {
        cohorts.validate()?;
        Ok(Self { cohorts, tips })
    }

    /// Parse and validate both tables
    pub fn from_json_str(cohorts_json: &str, tips_json: &str) -> Result<Self> {
        let cohorts: CohortTable = serde_json::from_str(cohorts_json)
            .map_err(|e| AnalysisError::invalid("cohort", e.to_string()))?;
        let tips: TipsFile =
            serde_json::from_str(tips_json).map_err(|e| AnalysisError::invalid("tips", e.to_string()))?;
        Self::new(cohorts, TipsTable::new(tips)?)
    }

    pub fn from_paths(cohorts_path: impl AsRef<Path>, tips_path: impl AsRef<Path>) -> Result<Self> {
        let cohorts_json = read(cohorts_path.as_ref())?;
        let tips_json = read(tips_path.as_ref())?;
        Self::from_json_str(&cohorts_json, &tips_json)
    }

    /// Tables compiled into the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_COHORTS, BUILTIN_TIPS)
    }

    pub fn cohorts(&self) -> &CohortTable {
        &self.cohorts
    }

    pub fn tips(&self) -> &TipsTable {
        &self.tips
    }

    pub fn cohort_version(&self) -> &str {
        &self.cohorts.version
    }

    pub fn tips_version(&self) -> &str {
        self.tips.version()
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Shared holder for the current tables
#[derive(Debug)]
pub struct ReferenceStore {
    current: RwLock<Arc<ReferenceTables>>,
}

impl ReferenceStore {
    pub fn new(tables: ReferenceTables) -> Self {
        Self {
            current: RwLock::new(Arc::new(tables)),
        }
    }

    /// The tables as of now; unaffected by later reloads
    pub fn snapshot(&self) -> Arc<ReferenceTables> {
        // Tables are never mutated in place, so a poisoned lock still holds a valid Arc
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in new tables, returning the previous ones
    pub fn reload(&self, tables: ReferenceTables) -> Arc<ReferenceTables> {
        let next = Arc::new(tables);
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        log::info!(
            "reference tables reloaded: cohorts {} -> {}, tips {} -> {}",
            guard.cohort_version(),
            next.cohort_version(),
            guard.tips_version(),
            next.tips_version()
        );
        std::mem::replace(&mut *guard, next)
    }
}

static GLOBAL: OnceCell<ReferenceStore> = OnceCell::new();

/// Install the process-wide tables. Fails if they are already installed.
pub fn install(tables: ReferenceTables) -> Result<()> {
    let (cohorts, tips) = (tables.cohort_version().to_string(), tables.tips_version().to_string());
    GLOBAL
        .set(ReferenceStore::new(tables))
        .map_err(|_| AnalysisError::Config("reference tables already installed; use reload".to_string()))?;
    log::info!("reference tables installed: cohorts {cohorts}, tips {tips}");
    Ok(())
}

/// Snapshot of the process-wide tables, if installed
pub fn current() -> Option<Arc<ReferenceTables>> {
    GLOBAL.get().map(ReferenceStore::snapshot)
}

/// Atomically replace the process-wide tables
pub fn reload(tables: ReferenceTables) -> Result<Arc<ReferenceTables>> {
    GLOBAL
        .get()
        .map(|store| store.reload(tables))
        .ok_or_else(|| AnalysisError::Config("reference tables not installed".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::Metric;
    use crate::classifier::ClubCategory;

    #[test]
    fn test_builtin_tables_load() {
        let tables = ReferenceTables::builtin().unwrap();
        for cohort in ["pga_tour", "lpga_tour", "amateur_low", "amateur_mid", "amateur_high"] {
            for category in ClubCategory::ALL {
                for metric in Metric::ALL {
                    assert!(
                        tables.cohorts().bands(cohort, category, metric).is_ok(),
                        "{cohort}.{category}.{metric}"
                    );
                }
            }
        }
        assert!(!tables.tips().tips().is_empty());
    }

    #[test]
    fn test_builtin_bands_span_full_range() {
        let tables = ReferenceTables::builtin().unwrap();
        for cohort in tables.cohorts().cohort_names() {
            for category in ClubCategory::ALL {
                for metric in Metric::ALL {
                    let bands = tables.cohorts().bands(cohort, category, metric).unwrap();
                    let points = bands.breakpoints();
                    let (first, last) = (points[0], points[points.len() - 1]);
                    assert_eq!(first.percentile, 0.0, "{cohort}.{category}.{metric}");
                    assert_eq!(last.percentile, 100.0, "{cohort}.{category}.{metric}");

                    // Just below the second breakpoint interpolates, no jump to 0
                    let value = points[1].value - 0.01 * (points[1].value - first.value);
                    let p = bands.percentile(value).unwrap();
                    assert!(p > 0.0 && p < points[1].percentile, "{cohort}.{category}.{metric}: {p}");
                }
            }
        }
    }

    #[test]
    fn test_malformed_json_is_reference_error() {
        let err = ReferenceTables::from_json_str("{ not json", BUILTIN_TIPS).unwrap_err();
        assert!(matches!(err, AnalysisError::ReferenceDataInvalid { table: "cohort", .. }));

        let err = ReferenceTables::from_json_str(BUILTIN_COHORTS, r#"{"version": "1"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::ReferenceDataInvalid { table: "tips", .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ReferenceTables::from_paths("/nonexistent/benchmarks.json", "/nonexistent/tips.json").unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }

    #[test]
    fn test_reload_swaps_whole_table() {
        let store = ReferenceStore::new(ReferenceTables::builtin().unwrap());
        let before = store.snapshot();

        let mut cohorts = before.cohorts().clone();
        cohorts.version = "next".to_string();
        let next = ReferenceTables::new(cohorts, before.tips().clone()).unwrap();

        let previous = store.reload(next);
        assert_eq!(previous.cohort_version(), before.cohort_version());
        assert_eq!(before.cohort_version(), "2024.1", "held snapshot is untouched");
        assert_eq!(store.snapshot().cohort_version(), "next");
    }

    #[test]
    fn test_global_install_once() {
        install(ReferenceTables::builtin().unwrap()).unwrap();
        assert!(install(ReferenceTables::builtin().unwrap()).is_err());
        assert!(current().is_some());
        reload(ReferenceTables::builtin().unwrap()).unwrap();
        assert_eq!(current().unwrap().cohort_version(), "2024.1");
    }
}
