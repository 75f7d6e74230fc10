//! Engine configuration.
//!
//! Every section has defaults, so an empty JSON object is a complete config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::benchmark::BenchmarkConfig;
use crate::classifier::ClassifierConfig;
use crate::club_estimate::ClubEstimateConfig;
use crate::coaching::DiagnosticsConfig;
use crate::error::{AnalysisError, Result};
use crate::measurement::InputBounds;
use crate::trajectory::SimulatorConfig;
use crate::units::UnitSystem;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub simulator: SimulatorConfig,
    pub bounds: InputBounds,
    pub classifier: ClassifierConfig,
    pub benchmark: BenchmarkConfig,
    pub diagnostics: DiagnosticsConfig,
    pub club_estimate: ClubEstimateConfig,
    /// Units for the secondary trajectory report
    pub display_units: UnitSystem,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.simulator.validate()?;
        self.bounds.validate()?;
        self.classifier.validate()?;
        self.benchmark.validate()?;
        self.diagnostics.validate()?;
        self.club_estimate.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::Integrator;

    #[test]
    fn test_empty_object_is_default() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json_str(
            r#"{
                "simulator": { "integrator": "euler", "time_step_s": 0.002 },
                "benchmark": { "cohorts": ["pga_tour"] }
            }"#,
        )
        .unwrap();
        assert_eq!(config.simulator.integrator, Integrator::Euler);
        assert_eq!(config.simulator.time_step_s, 0.002);
        assert_eq!(config.simulator.max_steps, SimulatorConfig::default().max_steps);
        assert_eq!(config.benchmark.cohorts, vec!["pga_tour".to_string()]);
    }

    #[test]
    fn test_invalid_section_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "simulator": { "time_step_s": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));

        let err = EngineConfig::from_json_str(r#"{ "simulator": 5 }"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Json(_)));
    }

    #[test]
    fn test_cue_limit_above_three_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "diagnostics": { "max_cues": 10 } }"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_default_validates() {
        EngineConfig::default().validate().unwrap();
    }
}
