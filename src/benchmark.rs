//! Percentile benchmarks against reference cohorts.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::classifier::{ClubCategory, ShotClassification};
use crate::error::AnalysisError;
use crate::measurement::ShotMeasurement;

const TABLE: &str = "cohort";

/// Benchmarked launch metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    BallSpeed,
    VerticalLaunchAngle,
    HorizontalLaunchAngle,
    TotalSpin,
    SpinAxis,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::BallSpeed,
        Metric::VerticalLaunchAngle,
        Metric::HorizontalLaunchAngle,
        Metric::TotalSpin,
        Metric::SpinAxis,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::BallSpeed => "ball_speed",
            Metric::VerticalLaunchAngle => "vertical_launch_angle",
            Metric::HorizontalLaunchAngle => "horizontal_launch_angle",
            Metric::TotalSpin => "total_spin",
            Metric::SpinAxis => "spin_axis",
        }
    }

    /// Raw measured value in table units (m/s, degrees, rpm).
    /// Directional metrics are signed as the device reports them.
    pub fn value(self, measurement: &ShotMeasurement) -> f64 {
        match self {
            Metric::BallSpeed => measurement.ball_speed_mps(),
            Metric::VerticalLaunchAngle => measurement.vertical_launch_angle_deg(),
            Metric::HorizontalLaunchAngle => measurement.horizontal_launch_angle_deg(),
            Metric::TotalSpin => measurement.total_spin_rpm(),
            Metric::SpinAxis => measurement.spin_axis_deg(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub value: f64,
    pub percentile: f64,
}

/// Piecewise-linear mapping from a raw value to a percentile
///
/// Breakpoints are strictly increasing in value and non-decreasing in
/// percentile, so the mapping is monotonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentileBands {
    breakpoints: Vec<Breakpoint>,
}

impl PercentileBands {
    pub fn new(breakpoints: Vec<Breakpoint>) -> Result<Self, String> {
        let bands = Self { breakpoints };
        bands.check()?;
        Ok(bands)
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    fn check(&self) -> Result<(), String> {
        if self.breakpoints.len() < 2 {
            return Err("at least two breakpoints are required".to_string());
        }
        for bp in &self.breakpoints {
            if !bp.value.is_finite() {
                return Err(format!("non-finite breakpoint value {}", bp.value));
            }
            if !(0.0..=100.0).contains(&bp.percentile) {
                return Err(format!("percentile {} outside 0..=100", bp.percentile));
            }
        }
        for pair in self.breakpoints.windows(2) {
            if pair[1].value <= pair[0].value {
                return Err(format!(
                    "breakpoint values must strictly increase ({} then {})",
                    pair[0].value, pair[1].value
                ));
            }
            if pair[1].percentile < pair[0].percentile {
                return Err(format!(
                    "percentiles must not decrease ({} then {})",
                    pair[0].percentile, pair[1].percentile
                ));
            }
        }
        Ok(())
    }

    /// Percentile of `value`, interpolated between the two nearest
    /// breakpoints. Below the table is 0, above is 100.
    pub fn percentile(&self, value: f64) -> Option<f64> {
        let first = self.breakpoints.first()?;
        let last = self.breakpoints.last()?;
        if value.is_nan() {
            return None;
        }
        if value < first.value {
            return Some(0.0);
        }
        if value > last.value {
            return Some(100.0);
        }

        // First breakpoint strictly above value; at least 1 since value >= first
        let upper = self.breakpoints.partition_point(|bp| bp.value <= value);
        if upper == self.breakpoints.len() {
            return Some(last.percentile);
        }
        let lo = self.breakpoints[upper - 1];
        let hi = self.breakpoints[upper];
        let t = (value - lo.value) / (hi.value - lo.value);
        Some(lo.percentile + t * (hi.percentile - lo.percentile))
    }
}

/// Coarse label for a percentile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileBand {
    BelowP10,
    P10P25,
    P25P50,
    P50P75,
    P75P90,
    AboveP90,
}

impl PercentileBand {
    pub fn from_percentile(percentile: f64) -> Self {
        match percentile {
            p if p < 10.0 => PercentileBand::BelowP10,
            p if p < 25.0 => PercentileBand::P10P25,
            p if p < 50.0 => PercentileBand::P25P50,
            p if p < 75.0 => PercentileBand::P50P75,
            p if p < 90.0 => PercentileBand::P75P90,
            _ => PercentileBand::AboveP90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PercentileBand::BelowP10 => "below_p10",
            PercentileBand::P10P25 => "p10_p25",
            PercentileBand::P25P50 => "p25_p50",
            PercentileBand::P50P75 => "p50_p75",
            PercentileBand::P75P90 => "p75_p90",
            PercentileBand::AboveP90 => "above_p90",
        }
    }
}

type CategoryBands = BTreeMap<ClubCategory, BTreeMap<Metric, PercentileBands>>;

/// Cohort percentile table: cohort → club category → metric → bands
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CohortTable {
    pub version: String,
    pub cohorts: BTreeMap<String, CategoryBands>,
}

impl CohortTable {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.version.trim().is_empty() {
            return Err(AnalysisError::invalid(TABLE, "missing version"));
        }
        if self.cohorts.is_empty() {
            return Err(AnalysisError::invalid(TABLE, "no cohorts defined"));
        }
        for (cohort, categories) in &self.cohorts {
            if categories.contains_key(&ClubCategory::Unknown) {
                return Err(AnalysisError::invalid(TABLE, format!("{cohort}: 'unknown' is not a club category")));
            }
            for (category, metrics) in categories {
                for (metric, bands) in metrics {
                    bands
                        .check()
                        .map_err(|reason| AnalysisError::invalid(TABLE, format!("{cohort}.{category}.{metric}: {reason}")))?;
                }
            }
        }
        Ok(())
    }

    pub fn cohort_names(&self) -> impl Iterator<Item = &str> {
        self.cohorts.keys().map(String::as_str)
    }

    pub fn bands(&self, cohort: &str, category: ClubCategory, metric: Metric) -> Result<&PercentileBands, AnalysisError> {
        self.cohorts
            .get(cohort)
            .ok_or_else(|| AnalysisError::lookup_miss(TABLE, cohort))?
            .get(&category)
            .ok_or_else(|| AnalysisError::lookup_miss(TABLE, format!("{cohort}.{category}")))?
            .get(&metric)
            .ok_or_else(|| AnalysisError::lookup_miss(TABLE, format!("{cohort}.{category}.{metric}")))
    }
}

/// Which cohorts and metrics to report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub cohorts: Vec<String>,
    pub metrics: Vec<Metric>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            cohorts: ["pga_tour", "lpga_tour", "amateur_low", "amateur_mid", "amateur_high"]
                .into_iter()
                .map(String::from)
                .collect(),
            metrics: Metric::ALL.to_vec(),
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.cohorts.iter().any(|c| c.trim().is_empty()) {
            return Err(AnalysisError::Config("benchmark cohort names must not be empty".to_string()));
        }
        Ok(())
    }
}

/// One benchmark cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BenchmarkEntry {
    Available { percentile: f64, band: PercentileBand },
    Unavailable,
}

impl BenchmarkEntry {
    fn available(percentile: f64) -> Self {
        BenchmarkEntry::Available {
            percentile,
            band: PercentileBand::from_percentile(percentile),
        }
    }

    pub fn percentile(&self) -> Option<f64> {
        match self {
            BenchmarkEntry::Available { percentile, .. } => Some(*percentile),
            BenchmarkEntry::Unavailable => None,
        }
    }

    pub fn band(&self) -> Option<PercentileBand> {
        match self {
            BenchmarkEntry::Available { band, .. } => Some(*band),
            BenchmarkEntry::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, BenchmarkEntry::Available { .. })
    }
}

/// Serialized as the bare percentile or the string `"unavailable"`
impl Serialize for BenchmarkEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BenchmarkEntry::Available { percentile, .. } => serializer.serialize_f64(*percentile),
            BenchmarkEntry::Unavailable => serializer.serialize_str("unavailable"),
        }
    }
}

/// Percentiles per cohort and metric
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct BenchmarkResult {
    pub cohorts: BTreeMap<String, BTreeMap<Metric, BenchmarkEntry>>,
    /// Lookup misses, one per missing cohort, category or metric
    #[serde(skip)]
    pub lookup_misses: Vec<String>,
}

impl BenchmarkResult {
    pub fn entry(&self, cohort: &str, metric: Metric) -> Option<&BenchmarkEntry> {
        self.cohorts.get(cohort)?.get(&metric)
    }

    /// Band labels for every available entry
    pub fn bands(&self) -> BTreeMap<String, BTreeMap<Metric, PercentileBand>> {
        self.cohorts
            .iter()
            .map(|(cohort, entries)| {
                let bands = entries
                    .iter()
                    .filter_map(|(metric, entry)| entry.band().map(|band| (*metric, band)))
                    .collect();
                (cohort.clone(), bands)
            })
            .collect()
    }
}

/// Look up every configured cohort and metric for the shot's club category.
///
/// Misses never fail the comparison; the entry is marked unavailable.
pub fn compare(
    measurement: &ShotMeasurement,
    classification: &ShotClassification,
    table: &CohortTable,
    config: &BenchmarkConfig,
) -> BenchmarkResult {
    let mut result = BenchmarkResult::default();
    let category = classification.club_category;

    for cohort in &config.cohorts {
        let mut entries = BTreeMap::new();

        let categories = match table.cohorts.get(cohort) {
            Some(categories) => Some(categories),
            None => {
                let miss = AnalysisError::lookup_miss(TABLE, cohort.as_str());
                log::warn!("{miss}");
                result.lookup_misses.push(miss.to_string());
                None
            }
        };

        let metrics = categories.and_then(|categories| match categories.get(&category) {
            Some(metrics) => Some(metrics),
            None => {
                // Mishits have no category to compare against
                if category != ClubCategory::Unknown {
                    let miss = AnalysisError::lookup_miss(TABLE, format!("{cohort}.{category}"));
                    log::warn!("{miss}");
                    result.lookup_misses.push(miss.to_string());
                }
                None
            }
        });

        for &metric in &config.metrics {
            let entry = match metrics {
                Some(metrics) => match metrics.get(&metric) {
                    Some(bands) => bands
                        .percentile(metric.value(measurement))
                        .map_or(BenchmarkEntry::Unavailable, BenchmarkEntry::available),
                    None => {
                        let miss = AnalysisError::lookup_miss(TABLE, format!("{cohort}.{category}.{metric}"));
                        log::warn!("{miss}");
                        result.lookup_misses.push(miss.to_string());
                        BenchmarkEntry::Unavailable
                    }
                },
                None => BenchmarkEntry::Unavailable,
            };
            entries.insert(metric, entry);
        }

        result.cohorts.insert(cohort.clone(), entries);
    }

    log::debug!(
        "benchmarked {} cohorts for {category}, {} misses",
        result.cohorts.len(),
        result.lookup_misses.len()
    );
    result
}
