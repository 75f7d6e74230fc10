//! Shot classification: club category and shot shape.
//!
//! Both decisions are driven by ordered tables in [`ClassifierConfig`]
//! rather than by branches, so thresholds can be tuned and versioned as data.
//! Classification always runs on a [`NormalizedLaunch`], so the tables only
//! ever describe a right-handed player.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::measurement::{Handedness, NormalizedLaunch, ShotMeasurement};

/// Club category inferred from launch conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubCategory {
    Wedge,
    ShortIron,
    MidIron,
    LongIron,
    Hybrid,
    Wood,
    Driver,
    /// No club could be inferred (mishit or unusable input)
    Unknown,
}

impl ClubCategory {
    pub const ALL: [ClubCategory; 7] = [
        ClubCategory::Wedge,
        ClubCategory::ShortIron,
        ClubCategory::MidIron,
        ClubCategory::LongIron,
        ClubCategory::Hybrid,
        ClubCategory::Wood,
        ClubCategory::Driver,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClubCategory::Wedge => "wedge",
            ClubCategory::ShortIron => "short_iron",
            ClubCategory::MidIron => "mid_iron",
            ClubCategory::LongIron => "long_iron",
            ClubCategory::Hybrid => "hybrid",
            ClubCategory::Wood => "wood",
            ClubCategory::Driver => "driver",
            ClubCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClubCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shot shape relative to the target line, in the player's own frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotShape {
    Straight,
    Draw,
    Fade,
    Hook,
    Slice,
    Pull,
    Push,
    PushDraw,
    PushHook,
    PushFade,
    PushSlice,
    PullDraw,
    PullHook,
    PullFade,
    PullSlice,
    Mishit,
}

impl ShotShape {
    pub const ALL: [ShotShape; 16] = [
        ShotShape::Straight,
        ShotShape::Draw,
        ShotShape::Fade,
        ShotShape::Hook,
        ShotShape::Slice,
        ShotShape::Pull,
        ShotShape::Push,
        ShotShape::PushDraw,
        ShotShape::PushHook,
        ShotShape::PushFade,
        ShotShape::PushSlice,
        ShotShape::PullDraw,
        ShotShape::PullHook,
        ShotShape::PullFade,
        ShotShape::PullSlice,
        ShotShape::Mishit,
    ];

    /// The shape that curves and starts the opposite way
    pub fn mirrored(self) -> ShotShape {
        match self {
            ShotShape::Straight => ShotShape::Straight,
            ShotShape::Draw => ShotShape::Fade,
            ShotShape::Fade => ShotShape::Draw,
            ShotShape::Hook => ShotShape::Slice,
            ShotShape::Slice => ShotShape::Hook,
            ShotShape::Pull => ShotShape::Push,
            ShotShape::Push => ShotShape::Pull,
            ShotShape::PushDraw => ShotShape::PullFade,
            ShotShape::PushHook => ShotShape::PullSlice,
            ShotShape::PushFade => ShotShape::PullDraw,
            ShotShape::PushSlice => ShotShape::PullHook,
            ShotShape::PullDraw => ShotShape::PushFade,
            ShotShape::PullHook => ShotShape::PushSlice,
            ShotShape::PullFade => ShotShape::PushDraw,
            ShotShape::PullSlice => ShotShape::PushHook,
            ShotShape::Mishit => ShotShape::Mishit,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShotShape::Straight => "straight",
            ShotShape::Draw => "draw",
            ShotShape::Fade => "fade",
            ShotShape::Hook => "hook",
            ShotShape::Slice => "slice",
            ShotShape::Pull => "pull",
            ShotShape::Push => "push",
            ShotShape::PushDraw => "push_draw",
            ShotShape::PushHook => "push_hook",
            ShotShape::PushFade => "push_fade",
            ShotShape::PushSlice => "push_slice",
            ShotShape::PullDraw => "pull_draw",
            ShotShape::PullHook => "pull_hook",
            ShotShape::PullFade => "pull_fade",
            ShotShape::PullSlice => "pull_slice",
            ShotShape::Mishit => "mishit",
        }
    }
}

impl fmt::Display for ShotShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start direction relative to the target line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartLine {
    Center,
    Push,
    Pull,
}

/// Curvature bucket from the spin axis tilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curvature {
    None,
    Draw,
    Hook,
    Fade,
    Slice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

/// How firmly the club band table matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Speed, launch and spin all inside one band
    High,
    /// Matched on ball speed alone
    Low,
    /// No inference possible
    None,
}

/// Half-open interval `[min, max)`; a missing end is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl BandRange {
    pub const ANY: BandRange = BandRange { min: None, max: None };

    pub const fn between(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min: Some(min), max: None }
    }

    pub const fn below(max: f64) -> Self {
        Self { min: None, max: Some(max) }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value < max)
    }

    fn lower(&self) -> f64 {
        self.min.unwrap_or(f64::NEG_INFINITY)
    }

    fn upper(&self) -> f64 {
        self.max.unwrap_or(f64::INFINITY)
    }

    fn intersects(&self, other: &BandRange) -> bool {
        self.lower().max(other.lower()) < self.upper().min(other.upper())
    }

    fn is_valid(&self) -> bool {
        !self.lower().is_nan() && !self.upper().is_nan() && self.lower() < self.upper()
    }
}

/// One leaf of the club decision table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubBand {
    pub category: ClubCategory,
    #[serde(default)]
    pub ball_speed_mps: BandRange,
    #[serde(default)]
    pub vertical_launch_deg: BandRange,
    #[serde(default)]
    pub total_spin_rpm: BandRange,
}

impl ClubBand {
    fn matches(&self, launch: &NormalizedLaunch) -> bool {
        self.ball_speed_mps.contains(launch.ball_speed_mps)
            && self.vertical_launch_deg.contains(launch.vertical_launch_deg)
            && self.total_spin_rpm.contains(launch.total_spin_rpm)
    }

    fn overlaps(&self, other: &ClubBand) -> bool {
        self.ball_speed_mps.intersects(&other.ball_speed_mps)
            && self.vertical_launch_deg.intersects(&other.vertical_launch_deg)
            && self.total_spin_rpm.intersects(&other.total_spin_rpm)
    }
}

/// Limits beyond which a strike is treated as a mishit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MishitRule {
    pub min_ball_speed_mps: f64,
    pub min_vertical_launch_deg: f64,
    pub max_vertical_launch_deg: f64,
    pub max_abs_horizontal_launch_deg: f64,
    pub max_abs_spin_axis_deg: f64,
}

impl Default for MishitRule {
    fn default() -> Self {
        Self {
            min_ball_speed_mps: 8.0,
            min_vertical_launch_deg: -10.0,
            max_vertical_launch_deg: 65.0,
            max_abs_horizontal_launch_deg: 20.0,
            max_abs_spin_axis_deg: 45.0,
        }
    }
}

impl MishitRule {
    pub fn is_mishit(&self, launch: &NormalizedLaunch) -> bool {
        !launch.is_finite()
            || launch.ball_speed_mps < self.min_ball_speed_mps
            || launch.vertical_launch_deg < self.min_vertical_launch_deg
            || launch.vertical_launch_deg > self.max_vertical_launch_deg
            || launch.horizontal_launch_deg.abs() > self.max_abs_horizontal_launch_deg
            || launch.spin_axis_deg.abs() > self.max_abs_spin_axis_deg
            || launch.total_spin_rpm < 0.0
    }
}

/// Magnitude thresholds (degrees) for start line and curvature
///
/// Values at or below a threshold fall in the smaller bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeThresholds {
    pub start_line_center_deg: f64,
    pub curvature_mild_deg: f64,
    pub curvature_severe_deg: f64,
}

impl Default for ShapeThresholds {
    fn default() -> Self {
        Self {
            start_line_center_deg: 1.0,
            curvature_mild_deg: 3.0,
            curvature_severe_deg: 8.0,
        }
    }
}

/// One entry of the shape combination table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRule {
    pub start_line: StartLine,
    pub curvature: Curvature,
    pub shape: ShotShape,
}

impl ShapeRule {
    const fn new(start_line: StartLine, curvature: Curvature, shape: ShotShape) -> Self {
        Self { start_line, curvature, shape }
    }
}

/// Classifier tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub version: String,
    pub mishit: MishitRule,
    /// Ordered by ascending ball-speed lower edge; first match wins
    pub club_bands: Vec<ClubBand>,
    pub shape_thresholds: ShapeThresholds,
    pub shape_table: Vec<ShapeRule>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        use ClubCategory::*;

        let band = |category, speed, launch, spin| ClubBand {
            category,
            ball_speed_mps: speed,
            vertical_launch_deg: launch,
            total_spin_rpm: spin,
        };

        Self {
            version: "2024.1".to_string(),
            mishit: MishitRule::default(),
            club_bands: vec![
                band(Wedge, BandRange::below(45.0), BandRange::ANY, BandRange::ANY),
                band(ShortIron, BandRange::between(45.0, 52.0), BandRange::ANY, BandRange::ANY),
                band(MidIron, BandRange::between(52.0, 58.0), BandRange::ANY, BandRange::ANY),
                band(LongIron, BandRange::between(58.0, 66.0), BandRange::below(12.0), BandRange::ANY),
                band(Hybrid, BandRange::between(58.0, 66.0), BandRange::at_least(12.0), BandRange::ANY),
                band(Driver, BandRange::between(66.0, 80.0), BandRange::ANY, BandRange::below(3000.0)),
                band(Wood, BandRange::between(66.0, 80.0), BandRange::ANY, BandRange::at_least(3000.0)),
                band(Driver, BandRange::at_least(80.0), BandRange::ANY, BandRange::ANY),
            ],
            shape_thresholds: ShapeThresholds::default(),
            shape_table: default_shape_table(),
        }
    }
}

fn default_shape_table() -> Vec<ShapeRule> {
    use Curvature as C;
    use ShotShape as S;
    use StartLine as L;

    vec![
        ShapeRule::new(L::Center, C::None, S::Straight),
        ShapeRule::new(L::Center, C::Draw, S::Draw),
        ShapeRule::new(L::Center, C::Hook, S::Hook),
        ShapeRule::new(L::Center, C::Fade, S::Fade),
        ShapeRule::new(L::Center, C::Slice, S::Slice),
        ShapeRule::new(L::Push, C::None, S::Push),
        ShapeRule::new(L::Push, C::Draw, S::PushDraw),
        ShapeRule::new(L::Push, C::Hook, S::PushHook),
        ShapeRule::new(L::Push, C::Fade, S::PushFade),
        ShapeRule::new(L::Push, C::Slice, S::PushSlice),
        ShapeRule::new(L::Pull, C::None, S::Pull),
        ShapeRule::new(L::Pull, C::Draw, S::PullDraw),
        ShapeRule::new(L::Pull, C::Hook, S::PullHook),
        ShapeRule::new(L::Pull, C::Fade, S::PullFade),
        ShapeRule::new(L::Pull, C::Slice, S::PullSlice),
    ]
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.club_bands.is_empty() {
            return Err(AnalysisError::Config("classifier.club_bands is empty".to_string()));
        }

        for (i, band) in self.club_bands.iter().enumerate() {
            if band.category == ClubCategory::Unknown {
                return Err(AnalysisError::Config(format!("club band {i} uses the reserved 'unknown' category")));
            }
            if !(band.ball_speed_mps.is_valid() && band.vertical_launch_deg.is_valid() && band.total_spin_rpm.is_valid()) {
                return Err(AnalysisError::Config(format!("club band {i} ({}) has an empty range", band.category)));
            }
        }

        for pair in self.club_bands.windows(2) {
            if pair[1].ball_speed_mps.lower() < pair[0].ball_speed_mps.lower() {
                return Err(AnalysisError::Config(format!(
                    "club bands must be ordered by ascending ball speed ({} after {})",
                    pair[1].category, pair[0].category
                )));
            }
        }

        for (i, a) in self.club_bands.iter().enumerate() {
            for b in &self.club_bands[i + 1..] {
                if a.overlaps(b) {
                    return Err(AnalysisError::Config(format!(
                        "club bands {} and {} overlap",
                        a.category, b.category
                    )));
                }
            }
        }

        let t = &self.shape_thresholds;
        if !(t.start_line_center_deg >= 0.0 && t.curvature_mild_deg >= 0.0 && t.curvature_mild_deg <= t.curvature_severe_deg) {
            return Err(AnalysisError::Config(
                "shape thresholds must satisfy 0 <= center, 0 <= mild <= severe".to_string(),
            ));
        }

        let mut seen = HashMap::new();
        for rule in &self.shape_table {
            if rule.shape == ShotShape::Mishit {
                return Err(AnalysisError::Config("shape table may not map to 'mishit'".to_string()));
            }
            if seen.insert((rule.start_line, rule.curvature), rule.shape).is_some() {
                return Err(AnalysisError::Config(format!(
                    "shape table has duplicate entry for {:?}/{:?}",
                    rule.start_line, rule.curvature
                )));
            }
        }
        if seen.len() != 15 {
            return Err(AnalysisError::Config(format!(
                "shape table must cover all 15 start-line/curvature combinations, found {}",
                seen.len()
            )));
        }

        Ok(())
    }
}

/// Classification of one shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotClassification {
    pub club_category: ClubCategory,
    pub club_confidence: Confidence,
    pub shot_shape: ShotShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<StartLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curvature: Option<Curvature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub handedness: Handedness,
}

impl ShotClassification {
    pub fn is_mishit(&self) -> bool {
        self.shot_shape == ShotShape::Mishit
    }
}

/// Table-driven shot classifier
#[derive(Debug, Clone)]
pub struct ShotClassifier {
    config: ClassifierConfig,
    shapes: HashMap<(StartLine, Curvature), ShotShape>,
}

impl Default for ShotClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl ShotClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let shapes = config
            .shape_table
            .iter()
            .map(|rule| ((rule.start_line, rule.curvature), rule.shape))
            .collect();
        Self { config, shapes }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, measurement: &ShotMeasurement, handedness: Handedness) -> ShotClassification {
        self.classify_launch(&NormalizedLaunch::from_measurement(measurement, handedness))
    }

    pub fn classify_launch(&self, launch: &NormalizedLaunch) -> ShotClassification {
        if self.config.mishit.is_mishit(launch) {
            log::debug!("mishit: {launch:?}");
            return ShotClassification {
                club_category: ClubCategory::Unknown,
                club_confidence: Confidence::None,
                shot_shape: ShotShape::Mishit,
                start_line: None,
                curvature: None,
                severity: None,
                handedness: launch.handedness,
            };
        }

        let (club_category, club_confidence) = self.club_category(launch);
        let start_line = self.start_line(launch.horizontal_launch_deg);
        let curvature = self.curvature(launch.spin_axis_deg);
        let shot_shape = self
            .shapes
            .get(&(start_line, curvature))
            .copied()
            .unwrap_or(ShotShape::Mishit);

        ShotClassification {
            club_category,
            club_confidence,
            shot_shape,
            start_line: Some(start_line),
            curvature: Some(curvature),
            severity: Some(self.severity(launch.spin_axis_deg)),
            handedness: launch.handedness,
        }
    }

    /// Walk the band table in order. A full match wins outright; otherwise
    /// fall back to the first band whose speed range alone matches, then to
    /// the nearest end of the table.
    fn club_category(&self, launch: &NormalizedLaunch) -> (ClubCategory, Confidence) {
        let bands = &self.config.club_bands;

        if let Some(band) = bands.iter().find(|band| band.matches(launch)) {
            return (band.category, Confidence::High);
        }
        if let Some(band) = bands.iter().find(|band| band.ball_speed_mps.contains(launch.ball_speed_mps)) {
            return (band.category, Confidence::Low);
        }

        let nearest = match (bands.first(), bands.last()) {
            (Some(first), _) if launch.ball_speed_mps < first.ball_speed_mps.lower() => Some(first),
            (_, last) => last,
        };
        match nearest {
            Some(band) => (band.category, Confidence::Low),
            None => (ClubCategory::Unknown, Confidence::None),
        }
    }

    fn start_line(&self, horizontal_launch_deg: f64) -> StartLine {
        if horizontal_launch_deg.abs() <= self.config.shape_thresholds.start_line_center_deg {
            StartLine::Center
        } else if horizontal_launch_deg > 0.0 {
            StartLine::Push
        } else {
            StartLine::Pull
        }
    }

    fn curvature(&self, spin_axis_deg: f64) -> Curvature {
        let t = &self.config.shape_thresholds;
        let magnitude = spin_axis_deg.abs();
        if magnitude <= t.curvature_mild_deg {
            Curvature::None
        } else if spin_axis_deg < 0.0 {
            if magnitude <= t.curvature_severe_deg { Curvature::Draw } else { Curvature::Hook }
        } else if magnitude <= t.curvature_severe_deg {
            Curvature::Fade
        } else {
            Curvature::Slice
        }
    }

    fn severity(&self, spin_axis_deg: f64) -> Severity {
        let t = &self.config.shape_thresholds;
        let magnitude = spin_axis_deg.abs();
        if magnitude <= t.curvature_mild_deg {
            Severity::Mild
        } else if magnitude <= t.curvature_severe_deg {
            Severity::Moderate
        } else {
            Severity::Severe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(speed: f64, vla: f64, hla: f64, spin: f64, axis: f64, hand: Handedness) -> ShotClassification {
        let shot = ShotMeasurement::now(speed, vla, hla, spin, axis);
        ShotClassifier::default().classify(&shot, hand)
    }

    #[test]
    fn test_default_config_is_valid() {
        ClassifierConfig::default().validate().unwrap();
    }

    #[test]
    fn test_club_categories_from_typical_launches() {
        let cases = [
            (74.0, 10.9, 2686.0, ClubCategory::Driver),
            (70.0, 9.2, 3655.0, ClubCategory::Wood),
            (63.0, 13.0, 4400.0, ClubCategory::Hybrid),
            (62.0, 11.0, 4600.0, ClubCategory::LongIron),
            (55.0, 14.1, 6231.0, ClubCategory::MidIron),
            (50.0, 18.0, 8000.0, ClubCategory::ShortIron),
            (40.0, 26.0, 9300.0, ClubCategory::Wedge),
            (85.0, 11.0, 2400.0, ClubCategory::Driver),
        ];
        for (speed, vla, spin, expected) in cases {
            let c = classify(speed, vla, 0.0, spin, 0.0, Handedness::Right);
            assert_eq!(c.club_category, expected, "speed {speed} vla {vla} spin {spin}");
            assert_eq!(c.club_confidence, Confidence::High);
        }
    }

    #[test]
    fn test_band_lower_edge_is_inclusive() {
        let c = classify(45.0, 20.0, 0.0, 8000.0, 0.0, Handedness::Right);
        assert_eq!(c.club_category, ClubCategory::ShortIron);
        let c = classify(44.999, 20.0, 0.0, 8000.0, 0.0, Handedness::Right);
        assert_eq!(c.club_category, ClubCategory::Wedge);
    }

    #[test]
    fn test_speed_only_fallback_is_low_confidence() {
        let mut config = ClassifierConfig::default();
        config.club_bands = vec![ClubBand {
            category: ClubCategory::MidIron,
            ball_speed_mps: BandRange::between(40.0, 60.0),
            vertical_launch_deg: BandRange::between(10.0, 20.0),
            total_spin_rpm: BandRange::ANY,
        }];
        let classifier = ShotClassifier::new(config);

        let off_launch = ShotMeasurement::now(50.0, 30.0, 0.0, 6000.0, 0.0);
        let c = classifier.classify(&off_launch, Handedness::Right);
        assert_eq!(c.club_category, ClubCategory::MidIron);
        assert_eq!(c.club_confidence, Confidence::Low);

        let too_fast = ShotMeasurement::now(75.0, 12.0, 0.0, 3000.0, 0.0);
        let c = classifier.classify(&too_fast, Handedness::Right);
        assert_eq!(c.club_category, ClubCategory::MidIron);
        assert_eq!(c.club_confidence, Confidence::Low);
    }

    #[test]
    fn test_shape_table() {
        let cases = [
            (0.0, 0.0, ShotShape::Straight),
            (0.5, -5.0, ShotShape::Draw),
            (0.5, -12.0, ShotShape::Hook),
            (-0.5, 5.0, ShotShape::Fade),
            (0.0, 12.0, ShotShape::Slice),
            (3.0, 0.0, ShotShape::Push),
            (-3.0, 2.0, ShotShape::Pull),
            (3.0, -5.0, ShotShape::PushDraw),
            (3.0, 5.0, ShotShape::PushFade),
            (3.0, 15.0, ShotShape::PushSlice),
            (-3.0, -5.0, ShotShape::PullDraw),
            (-3.0, -15.0, ShotShape::PullHook),
            (-3.0, 5.0, ShotShape::PullFade),
            (-2.5, 10.0, ShotShape::PullSlice),
        ];
        for (hla, axis, expected) in cases {
            let c = classify(60.0, 14.0, hla, 5000.0, axis, Handedness::Right);
            assert_eq!(c.shot_shape, expected, "hla {hla} axis {axis}");
        }
    }

    #[test]
    fn test_thresholds_are_inclusive_of_smaller_bucket() {
        let c = classify(60.0, 14.0, 1.0, 5000.0, 3.0, Handedness::Right);
        assert_eq!(c.shot_shape, ShotShape::Straight);
        assert_eq!(c.severity, Some(Severity::Mild));

        let c = classify(60.0, 14.0, 0.0, 5000.0, 8.0, Handedness::Right);
        assert_eq!(c.shot_shape, ShotShape::Fade);
        assert_eq!(c.severity, Some(Severity::Moderate));

        let c = classify(60.0, 14.0, 0.0, 5000.0, 8.01, Handedness::Right);
        assert_eq!(c.severity, Some(Severity::Severe));
    }

    #[test]
    fn test_left_handed_mirrors_input() {
        // A lefty's fade starts right and curves left on the device
        let rh = classify(60.0, 14.0, 3.0, 5000.0, 5.0, Handedness::Right);
        let lh = classify(60.0, 14.0, -3.0, 5000.0, -5.0, Handedness::Left);
        assert_eq!(rh.shot_shape, ShotShape::PushFade);
        assert_eq!(lh.shot_shape, ShotShape::PushFade);

        // Same device reading, opposite meaning
        let lh_same = classify(60.0, 14.0, 3.0, 5000.0, 5.0, Handedness::Left);
        assert_eq!(lh_same.shot_shape, rh.shot_shape.mirrored());
    }

    #[test]
    fn test_mirrored_is_involution() {
        for shape in ShotShape::ALL {
            assert_eq!(shape.mirrored().mirrored(), shape);
        }
    }

    #[test]
    fn test_zero_input_is_mishit() {
        let c = classify(0.0, 0.0, 0.0, 0.0, 0.0, Handedness::Right);
        assert!(c.is_mishit());
        assert_eq!(c.club_category, ClubCategory::Unknown);
        assert_eq!(c.club_confidence, Confidence::None);
        assert_eq!(c.severity, None);
    }

    #[test]
    fn test_implausible_direction_is_mishit() {
        assert!(classify(60.0, 14.0, 35.0, 5000.0, 0.0, Handedness::Right).is_mishit());
        assert!(classify(60.0, 14.0, 0.0, 5000.0, -70.0, Handedness::Right).is_mishit());
        assert!(classify(f64::NAN, 14.0, 0.0, 5000.0, 0.0, Handedness::Right).is_mishit());
    }

    #[test]
    fn test_validate_rejects_overlapping_bands() {
        let mut config = ClassifierConfig::default();
        config.club_bands.push(ClubBand {
            category: ClubCategory::Wood,
            ball_speed_mps: BandRange::between(70.0, 75.0),
            vertical_launch_deg: BandRange::ANY,
            total_spin_rpm: BandRange::ANY,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unordered_bands() {
        let mut config = ClassifierConfig::default();
        config.club_bands.reverse();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_incomplete_shape_table() {
        let mut config = ClassifierConfig::default();
        config.shape_table.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = ClassifierConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ClassifierConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
