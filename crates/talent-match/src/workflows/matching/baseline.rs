use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{
    CompetencyRecord, EmployeeId, PsychometricDimension, PsychometricRecord, SignalGap,
};
use super::source::TalentDataSource;
use super::transform::round2;
use super::{DataGap, MatchingError};

/// Mean and sample standard deviation of one dimension over the benchmark set.
///
/// `None` means the statistic is undefined: no observations for the mean, fewer
/// than two for the deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionStats {
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

impl DimensionStats {
    pub const NEUTRAL: DimensionStats = DimensionStats {
        mean: Some(0.0),
        std_dev: Some(1.0),
    };

    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                mean: None,
                std_dev: None,
            };
        }

        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let std_dev = if values.len() < 2 {
            None
        } else {
            let squared: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
            Some((squared / (count - 1.0)).sqrt())
        };

        Self {
            mean: Some(round2(mean)),
            std_dev: std_dev.map(round2),
        }
    }

    /// Whether the stats can produce a non-zero match.
    pub fn is_informative(&self) -> bool {
        self.mean.is_some() && self.std_dev.map(|std| std != 0.0).unwrap_or(false)
    }
}

/// Per-dimension statistics derived from the selected benchmark employees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub benchmark_count: usize,
    pub competencies: BTreeMap<String, DimensionStats>,
    pub psychometric: BTreeMap<PsychometricDimension, DimensionStats>,
    /// Set when no benchmark had psychometric data and the neutral block was used.
    pub psychometric_fallback: bool,
}

impl Baseline {
    /// Builds the baseline from rows already restricted to the benchmark set.
    pub fn from_records(
        benchmark_count: usize,
        competencies: &[CompetencyRecord],
        psychometrics: &[PsychometricRecord],
    ) -> Result<Self, MatchingError> {
        if competencies.is_empty() {
            return Err(MatchingError::DataUnavailable(
                DataGap::NoBenchmarkCompetencies,
            ));
        }

        let mut by_pillar: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in competencies {
            by_pillar
                .entry(record.pillar_code.as_str())
                .or_default()
                .push(record.score);
        }

        let competencies = by_pillar
            .into_iter()
            .map(|(pillar, scores)| (pillar.to_string(), DimensionStats::from_values(&scores)))
            .collect();

        let psychometric_fallback = psychometrics.is_empty();
        let psychometric = PsychometricDimension::ALL
            .into_iter()
            .map(|dimension| {
                if psychometric_fallback {
                    return (dimension, DimensionStats::NEUTRAL);
                }
                let values: Vec<f64> = psychometrics
                    .iter()
                    .filter_map(|record| record.value(dimension))
                    .collect();
                (dimension, DimensionStats::from_values(&values))
            })
            .collect();

        Ok(Self {
            benchmark_count,
            competencies,
            psychometric,
            psychometric_fallback,
        })
    }

    pub fn pillar(&self, code: &str) -> Option<&DimensionStats> {
        self.competencies.get(code)
    }

    pub fn psychometric(&self, dimension: PsychometricDimension) -> Option<&DimensionStats> {
        self.psychometric.get(&dimension)
    }

    /// Looks a dimension up by name: a pillar code, or `PAULI`, `GTQ`, `IQ`.
    pub fn dimension(&self, name: &str) -> Option<&DimensionStats> {
        PsychometricDimension::ALL
            .into_iter()
            .find(|dimension| dimension.label() == name)
            .and_then(|dimension| self.psychometric(dimension))
            .or_else(|| self.pillar(name))
    }

    /// Gaps that affect every employee scored against this baseline.
    pub fn signal_gaps(&self) -> Vec<SignalGap> {
        let mut gaps = Vec::new();
        if self.psychometric_fallback {
            gaps.push(SignalGap::NoPsychometricBaseline);
        }
        for (pillar, stats) in &self.competencies {
            if !stats.is_informative() {
                gaps.push(SignalGap::UndefinedBaseline(pillar.clone()));
            }
        }
        for (dimension, stats) in &self.psychometric {
            if !stats.is_informative() {
                gaps.push(SignalGap::UndefinedBaseline(dimension.label().to_string()));
            }
        }
        gaps
    }
}

/// Fetches benchmark rows in bulk and turns them into a [`Baseline`].
pub struct BaselineBuilder<'a, S: ?Sized> {
    source: &'a S,
    year: i32,
}

impl<'a, S> BaselineBuilder<'a, S>
where
    S: TalentDataSource + ?Sized,
{
    pub fn new(source: &'a S, year: i32) -> Self {
        Self { source, year }
    }

    pub fn build(&self, benchmark_ids: &BTreeSet<EmployeeId>) -> Result<Baseline, MatchingError> {
        let competencies = self.source.competencies(self.year, Some(benchmark_ids))?;
        let psychometrics = self.source.psychometrics(Some(benchmark_ids))?;
        debug!(
            year = self.year,
            competency_rows = competencies.len(),
            psychometric_rows = psychometrics.len(),
            "fetched benchmark rows"
        );

        let baseline =
            match Baseline::from_records(benchmark_ids.len(), &competencies, &psychometrics) {
                Ok(baseline) => baseline,
                Err(err) => {
                    warn!(
                        year = self.year,
                        benchmarks = benchmark_ids.len(),
                        %err,
                        "baseline unavailable"
                    );
                    return Err(err);
                }
            };

        if baseline.psychometric_fallback {
            warn!("no psychometric data for benchmarks; using neutral psychometric baseline");
        }
        info!(
            benchmarks = baseline.benchmark_count,
            pillars = baseline.competencies.len(),
            psychometric_fallback = baseline.psychometric_fallback,
            "baseline built"
        );

        Ok(baseline)
    }
}
