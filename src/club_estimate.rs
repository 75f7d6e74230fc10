//! Estimated club delivery from ball flight.
//!
//! Heuristic only: ball data cannot determine face and path uniquely, so
//! every value here is tagged as estimated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classifier::{ClubCategory, ShotClassification};
use crate::error::AnalysisError;
use crate::measurement::NormalizedLaunch;

/// Smash factors and face/path weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubEstimateConfig {
    pub smash_factors: BTreeMap<ClubCategory, f64>,
    /// Used when the category has no entry
    pub default_smash_factor: f64,
    /// face ≈ face_hla_weight·HLA + face_axis_weight·axis
    pub face_hla_weight: f64,
    pub face_axis_weight: f64,
    /// path ≈ path_hla_weight·HLA − path_axis_weight·axis
    pub path_hla_weight: f64,
    pub path_axis_weight: f64,
}

impl Default for ClubEstimateConfig {
    fn default() -> Self {
        let smash_factors = [
            (ClubCategory::Driver, 1.48),
            (ClubCategory::Wood, 1.46),
            (ClubCategory::Hybrid, 1.42),
            (ClubCategory::LongIron, 1.38),
            (ClubCategory::MidIron, 1.35),
            (ClubCategory::ShortIron, 1.30),
            (ClubCategory::Wedge, 1.25),
        ]
        .into_iter()
        .collect();

        Self {
            smash_factors,
            default_smash_factor: 1.40,
            face_hla_weight: 0.8,
            face_axis_weight: 0.1,
            path_hla_weight: 0.5,
            path_axis_weight: 0.1,
        }
    }
}

impl ClubEstimateConfig {
    pub fn smash_factor(&self, category: ClubCategory) -> f64 {
        self.smash_factors
            .get(&category)
            .copied()
            .unwrap_or(self.default_smash_factor)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let factors = self
            .smash_factors
            .iter()
            .map(|(category, factor)| (category.as_str(), *factor))
            .chain(std::iter::once(("default", self.default_smash_factor)));
        for (name, factor) in factors {
            if !(factor.is_finite() && factor >= 1.0) {
                return Err(AnalysisError::Config(format!(
                    "club_estimate smash factor for {name} must be >= 1.0, got {factor}"
                )));
            }
        }
        Ok(())
    }
}

/// Estimated club delivery in the right-handed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubEstimate {
    pub estimated_club_speed_mps: f64,
    pub smash_factor: f64,
    pub estimated_face_angle_deg: f64,
    pub estimated_path_angle_deg: f64,
    /// Positive = face open to path
    pub estimated_face_to_path_deg: f64,
    pub is_estimated: bool,
}

/// Estimate club data, or `None` for a mishit or a stationary ball
pub fn estimate(
    launch: &NormalizedLaunch,
    classification: &ShotClassification,
    config: &ClubEstimateConfig,
) -> Option<ClubEstimate> {
    if classification.is_mishit() || !launch.is_finite() || launch.ball_speed_mps <= 0.0 {
        return None;
    }

    let smash_factor = config.smash_factor(classification.club_category);
    let face = config.face_hla_weight * launch.horizontal_launch_deg + config.face_axis_weight * launch.spin_axis_deg;
    let path = config.path_hla_weight * launch.horizontal_launch_deg - config.path_axis_weight * launch.spin_axis_deg;

    Some(ClubEstimate {
        estimated_club_speed_mps: launch.ball_speed_mps / smash_factor,
        smash_factor,
        estimated_face_angle_deg: face,
        estimated_path_angle_deg: path,
        estimated_face_to_path_deg: face - path,
        is_estimated: true,
    })
}
