//! Benchmark-driven talent matching.
//!
//! A run builds a [`Baseline`] from the selected benchmark employees, scores the
//! year's whole roster against it with [`MatchScorer`], and ranks the results.
//! [`TalentMatchService`] composes those steps with job profile generation and
//! the display joins used by the API and CLI.

pub mod baseline;
pub mod domain;
pub mod loader;
pub mod report;
pub mod router;
pub mod scorer;
pub mod service;
pub mod source;
pub mod transform;

#[cfg(test)]
mod tests;

pub use baseline::{Baseline, BaselineBuilder, DimensionStats};
pub use domain::{
    CompetencyRecord, EmployeeId, EmployeeSummary, MatchCategory, MatchResult, PerformanceRecord,
    PsychometricDimension, PsychometricRecord, SignalGap,
};
pub use loader::{load_store_from_dir, LoaderError};
pub use report::{AnalysisReport, RankedTalentView, SummaryInsights};
pub use router::talent_router;
pub use scorer::{MatchScorer, ScoringProgress, TgvWeights, FINAL_WEIGHTS};
pub use service::{AnalysisRequest, HighPerformers, MatchingConfig, TalentMatchService};
pub use source::{InMemoryTalentStore, SourceError, TalentDataSource};
pub use transform::{tv_match, tv_match_batch};

/// Required data that a source returned no rows for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataGap {
    NoBenchmarkCompetencies,
    NoRoster { year: i32 },
}

impl std::fmt::Display for DataGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataGap::NoBenchmarkCompetencies => {
                write!(f, "no competency data for the selected benchmarks")
            }
            DataGap::NoRoster { year } => write!(f, "no employees found for {year}"),
        }
    }
}

/// Fatal outcome of an analysis run. No partial baseline or ranking accompanies it.
#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error("data unavailable: {0}")]
    DataUnavailable(DataGap),
    #[error("select at least {required} benchmark employees (got {selected})")]
    InsufficientBenchmarks { selected: usize, required: usize },
    #[error(transparent)]
    Source(#[from] SourceError),
}
