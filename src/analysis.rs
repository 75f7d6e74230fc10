//! Shot analysis orchestration.
//!
//! [`Analyzer::analyze`] runs simulator, classifier, benchmark comparator and
//! coaching engine for one shot and folds their outputs into an
//! [`AnalysisResult`]. Per-shot problems become flags on the result; nothing
//! here returns an error.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use serde::Serialize;

use crate::benchmark::{self, BenchmarkResult, Metric, PercentileBand};
use crate::classifier::{ClubCategory, Confidence, Curvature, Severity, ShotShape, StartLine};
use crate::club_estimate::{self, ClubEstimate};
use crate::coaching::{self, CoachingResult};
use crate::config::EngineConfig;
use crate::engine::{PhysicsEngine, SimulationEngine};
use crate::error::{AnalysisError, Result};
use crate::launch::spin_components;
use crate::measurement::{ClampedInput, Handedness, NormalizedLaunch, ShotMeasurement};
use crate::reference::ReferenceTables;
use crate::trajectory::{TrajectoryEstimate, TrajectoryUsCustomary};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The measurement exactly as captured, plus mph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasuredSection {
    pub ball_speed_meters_per_second: f64,
    pub ball_speed_mph: f64,
    pub vertical_launch_angle_degrees: f64,
    pub horizontal_launch_angle_degrees: f64,
    pub total_spin_rpm: f64,
    pub spin_axis_degrees: f64,
}

impl From<&ShotMeasurement> for MeasuredSection {
    fn from(m: &ShotMeasurement) -> Self {
        Self {
            ball_speed_meters_per_second: m.ball_speed_mps(),
            ball_speed_mph: m.ball_speed_mph(),
            vertical_launch_angle_degrees: m.vertical_launch_angle_deg(),
            horizontal_launch_angle_degrees: m.horizontal_launch_angle_deg(),
            total_spin_rpm: m.total_spin_rpm(),
            spin_axis_degrees: m.spin_axis_deg(),
        }
    }
}

/// Everything derived from the measurement by classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferredSection {
    pub club_category: ClubCategory,
    pub club_confidence: Confidence,
    pub shot_shape: ShotShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<StartLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curvature: Option<Curvature>,
    pub handedness: Handedness,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club_estimate: Option<ClubEstimate>,
    /// Backspin and sidespin split of the measured spin, in the device frame.
    /// Positive sidespin curves the ball right.
    pub backspin_rpm: f64,
    pub sidespin_rpm: f64,
    pub is_inferred: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    pub engine_version: &'static str,
    pub engine_backend: String,
    pub trajectory_is_estimated: bool,
    pub trajectory_available: bool,
    pub trajectory_model_note: String,
    /// Capture time of the measurement
    pub timestamp: DateTime<Utc>,
    pub cohort_table_version: String,
    pub tips_table_version: String,
    pub classifier_version: String,
    /// Machine-readable problem tags, e.g. `simulation_unavailable`
    pub flags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clamped_inputs: Vec<ClampedInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trajectory_error: Option<String>,
}

impl AnalysisMetadata {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// Aggregate analysis of one shot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub measured: MeasuredSection,
    pub inferred: InferredSection,
    pub benchmarks: BenchmarkResult,
    pub benchmark_bands: BTreeMap<String, BTreeMap<Metric, PercentileBand>>,
    pub coaching: CoachingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_trajectory: Option<TrajectoryEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_customary_units: Option<TrajectoryUsCustomary>,
    pub metadata: AnalysisMetadata,
}

/// Shot analyzer over a simulation backend
pub struct Analyzer<E: SimulationEngine = PhysicsEngine> {
    engine: E,
    config: EngineConfig,
}

impl Default for Analyzer<PhysicsEngine> {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            engine: PhysicsEngine::new(&config),
            config,
        }
    }
}

impl Analyzer<PhysicsEngine> {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let engine = PhysicsEngine::new(&config);
        Self::with_engine(engine, config)
    }
}

impl<E: SimulationEngine> Analyzer<E> {
    pub fn with_engine(engine: E, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        measurement: &ShotMeasurement,
        handedness: Handedness,
        tables: &ReferenceTables,
    ) -> AnalysisResult {
        let mut flags = Vec::new();

        let outcome = self.engine.simulate(measurement, handedness);
        if let Some(clamp) = outcome.clamped_inputs.first() {
            flags.push(AnalysisError::from(clamp).kind().to_string());
        }
        let (estimated_trajectory, trajectory_error) = match outcome.result {
            Ok(estimate) => (Some(estimate), None),
            Err(e) => {
                flags.push(e.kind().to_string());
                (None, Some(e.to_string()))
            }
        };

        let classification = self.engine.classify(measurement, handedness);
        if classification.is_mishit() {
            flags.push("mishit".to_string());
        }

        let benchmarks = benchmark::compare(measurement, &classification, tables.cohorts(), &self.config.benchmark);
        let coaching = coaching::coach(measurement, &classification, tables.tips(), &self.config.diagnostics);
        if !benchmarks.lookup_misses.is_empty() || !coaching.missing_tips.is_empty() {
            flags.push("data_lookup_miss".to_string());
        }

        let launch = NormalizedLaunch::from_measurement(measurement, handedness);
        let club_estimate = club_estimate::estimate(&launch, &classification, &self.config.club_estimate);
        let (backspin_rpm, sidespin_rpm) = spin_components(measurement.total_spin_rpm(), measurement.spin_axis_deg());

        log::debug!(
            "analyzed shot: {} {} ({:?}), carry {:?}",
            classification.club_category,
            classification.shot_shape,
            classification.severity,
            estimated_trajectory.as_ref().map(|t| t.carry_distance_m)
        );

        let us_customary_units = estimated_trajectory.as_ref().map(TrajectoryEstimate::us_customary);
        let benchmark_bands = benchmarks.bands();

        AnalysisResult {
            measured: MeasuredSection::from(measurement),
            inferred: InferredSection {
                club_category: classification.club_category,
                club_confidence: classification.club_confidence,
                shot_shape: classification.shot_shape,
                severity: classification.severity,
                start_line: classification.start_line,
                curvature: classification.curvature,
                handedness: classification.handedness,
                club_estimate,
                backspin_rpm,
                sidespin_rpm,
                is_inferred: true,
            },
            benchmarks,
            benchmark_bands,
            coaching,
            metadata: AnalysisMetadata {
                engine_version: ENGINE_VERSION,
                engine_backend: self.engine.name().to_string(),
                trajectory_is_estimated: true,
                trajectory_available: estimated_trajectory.is_some(),
                trajectory_model_note: self.engine.model_note(),
                timestamp: measurement.timestamp(),
                cohort_table_version: tables.cohort_version().to_string(),
                tips_table_version: tables.tips_version().to_string(),
                classifier_version: self.config.classifier.version.clone(),
                flags,
                clamped_inputs: outcome.clamped_inputs,
                trajectory_error,
            },
            estimated_trajectory,
            us_customary_units,
        }
    }

    /// Analyze a session of shots in parallel. Output order matches input.
    pub fn analyze_batch(
        &self,
        measurements: &[ShotMeasurement],
        handedness: Handedness,
        tables: &ReferenceTables,
    ) -> Vec<AnalysisResult> {
        measurements
            .par_iter()
            .map(|measurement| self.analyze(measurement, handedness, tables))
            .collect()
    }
}

static DEFAULT_ANALYZER: Lazy<Analyzer> = Lazy::new(Analyzer::default);

/// Analyze with the default configuration and physics backend
pub fn analyze(measurement: &ShotMeasurement, handedness: Handedness, tables: &ReferenceTables) -> AnalysisResult {
    DEFAULT_ANALYZER.analyze(measurement, handedness, tables)
}
