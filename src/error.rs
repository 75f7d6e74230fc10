use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the shot analysis engine.
///
/// Only `ReferenceDataInvalid`, `Io`, `Json` and `Config` ever escape to a
/// caller, and only at load time. The per-shot variants are recorded in the
/// analysis result instead of being returned.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{field} = {value} is outside the plausible range, clamped to {clamped_to}")]
    InputOutOfRange { field: String, value: f64, clamped_to: f64 },

    #[error("no ground contact after {steps} steps ({elapsed_s:.2} s of flight)")]
    SimulationUnavailable { steps: usize, elapsed_s: f64 },

    #[error("no {table} entry for '{key}'")]
    DataLookupMiss { table: &'static str, key: String },

    #[error("invalid {table} reference data: {reason}")]
    ReferenceDataInvalid { table: &'static str, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AnalysisError {
    pub(crate) fn invalid(table: &'static str, reason: impl Into<String>) -> Self {
        Self::ReferenceDataInvalid { table, reason: reason.into() }
    }

    pub(crate) fn lookup_miss(table: &'static str, key: impl Into<String>) -> Self {
        Self::DataLookupMiss { table, key: key.into() }
    }

    /// Machine-readable tag used in result flags
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputOutOfRange { .. } => "input_out_of_range",
            Self::SimulationUnavailable { .. } => "simulation_unavailable",
            Self::DataLookupMiss { .. } => "data_lookup_miss",
            Self::ReferenceDataInvalid { .. } => "reference_data_invalid",
            Self::Io { .. } => "io",
            Self::Json(_) => "json",
            Self::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
