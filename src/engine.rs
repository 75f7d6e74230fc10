//! Simulation backend seam.
//!
//! The analyzer only talks to a [`SimulationEngine`]. [`PhysicsEngine`] is the
//! in-crate backend; alternative backends plug in behind the same trait.

use crate::classifier::{ShotClassification, ShotClassifier};
use crate::config::EngineConfig;
use crate::measurement::{Handedness, ShotMeasurement};
use crate::trajectory::{SimulationOutcome, TrajectorySimulator};

pub trait SimulationEngine: Send + Sync {
    /// Short backend identifier reported in result metadata
    fn name(&self) -> &str;

    /// Human-readable description of the flight model
    fn model_note(&self) -> String;

    fn simulate(&self, measurement: &ShotMeasurement, handedness: Handedness) -> SimulationOutcome;

    fn classify(&self, measurement: &ShotMeasurement, handedness: Handedness) -> ShotClassification;
}

/// Numerical flight model plus table-driven classifier
#[derive(Debug, Clone, Default)]
pub struct PhysicsEngine {
    simulator: TrajectorySimulator,
    classifier: ShotClassifier,
}

impl PhysicsEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            simulator: TrajectorySimulator::new(config.simulator.clone(), config.bounds.clone()),
            classifier: ShotClassifier::new(config.classifier.clone()),
        }
    }

    pub fn simulator(&self) -> &TrajectorySimulator {
        &self.simulator
    }

    pub fn classifier(&self) -> &ShotClassifier {
        &self.classifier
    }
}

impl SimulationEngine for PhysicsEngine {
    fn name(&self) -> &str {
        "physics"
    }

    fn model_note(&self) -> String {
        self.simulator.model_note()
    }

    fn simulate(&self, measurement: &ShotMeasurement, handedness: Handedness) -> SimulationOutcome {
        self.simulator.simulate(measurement, handedness)
    }

    fn classify(&self, measurement: &ShotMeasurement, handedness: Handedness) -> ShotClassification {
        self.classifier.classify(measurement, handedness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::Integrator;

    #[test]
    fn test_engine_uses_configured_integrator() {
        let mut config = EngineConfig::default();
        config.simulator.integrator = Integrator::Euler;
        let engine = PhysicsEngine::new(&config);
        assert_eq!(engine.simulator().config().integrator, Integrator::Euler);
        assert!(engine.model_note().contains("Euler"));
    }

    #[test]
    fn test_engine_is_object_safe() {
        let engine: Box<dyn SimulationEngine> = Box::new(PhysicsEngine::default());
        let shot = ShotMeasurement::now(60.0, 14.0, 0.0, 5000.0, 0.0);
        assert!(engine.simulate(&shot, Handedness::Right).is_available());
        assert_eq!(engine.name(), "physics");
    }
}
