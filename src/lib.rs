//! # Golf Coach Engine
//!
//! Shot analysis for golf launch monitors: estimated ball flight, club and
//! shot-shape classification, cohort percentile benchmarks and coaching cues
//! from five measured launch parameters.

// Re-export the main types and functions
pub use analysis::{analyze, AnalysisResult, Analyzer, ENGINE_VERSION};
pub use benchmark::{BenchmarkConfig, BenchmarkEntry, BenchmarkResult, CohortTable, Metric, PercentileBand};
pub use classifier::{ClassifierConfig, ClubCategory, Confidence, Severity, ShotClassification, ShotClassifier, ShotShape};
pub use coaching::{CoachingResult, Diagnostic, DiagnosticsConfig, TipsTable};
pub use config::EngineConfig;
pub use engine::{PhysicsEngine, SimulationEngine};
pub use error::{AnalysisError, Result};
pub use measurement::{Handedness, InputBounds, ShotInput, ShotMeasurement};
pub use reference::{ReferenceStore, ReferenceTables};
pub use trajectory::{Integrator, SimulationOutcome, SimulatorConfig, TrajectoryEstimate, TrajectorySimulator};
pub use units::UnitSystem;

// Module declarations
pub mod aerodynamics;
pub mod analysis;
pub mod benchmark;
pub mod classifier;
pub mod club_estimate;
pub mod coaching;
pub mod config;
mod constants;
pub mod engine;
pub mod error;
pub mod launch;
pub mod measurement;
pub mod reference;
pub mod trajectory;
pub mod units;
