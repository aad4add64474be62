use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::baseline::{Baseline, BaselineBuilder};
use super::domain::{EmployeeId, EmployeeSummary, MatchResult};
use super::report::{generate_insights, rank_talent, AnalysisReport, STRENGTHS_SAMPLE};
use super::scorer::{MatchScorer, ScoringProgress};
use super::source::TalentDataSource;
use super::MatchingError;
use crate::config::{DataConfig, DEFAULT_BENCHMARK_RATING, DEFAULT_SCORING_YEAR};
use crate::workflows::profile::{ProfileGenerator, ProfileRequest};

/// Fewest benchmark employees a baseline may be built from.
pub const MIN_BENCHMARKS: usize = 2;

/// Run-scoped settings handed to the service at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingConfig {
    pub scoring_year: i32,
    pub benchmark_rating: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            scoring_year: DEFAULT_SCORING_YEAR,
            benchmark_rating: DEFAULT_BENCHMARK_RATING,
        }
    }
}

impl From<&DataConfig> for MatchingConfig {
    fn from(config: &DataConfig) -> Self {
        Self {
            scoring_year: config.scoring_year,
            benchmark_rating: config.benchmark_rating,
        }
    }
}

/// Caller input for a full analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisRequest {
    pub role_name: String,
    pub job_level: String,
    #[serde(default)]
    pub role_purpose: String,
    pub benchmark_ids: Vec<EmployeeId>,
    /// Overrides the configured scoring year.
    #[serde(default)]
    pub year: Option<i32>,
}

/// Benchmark candidates together with the year and rating they were selected by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighPerformers {
    pub year: i32,
    pub rating: u8,
    pub employees: Vec<EmployeeSummary>,
}

/// Service composing the data source, baseline, scorer and profile generator.
pub struct TalentMatchService<S: ?Sized> {
    source: Arc<S>,
    generator: Arc<dyn ProfileGenerator>,
    config: MatchingConfig,
}

impl<S> TalentMatchService<S>
where
    S: TalentDataSource + ?Sized,
{
    pub fn new(
        source: Arc<S>,
        generator: Arc<dyn ProfileGenerator>,
        config: MatchingConfig,
    ) -> Self {
        Self {
            source,
            generator,
            config,
        }
    }

    /// Employees rated at or above the threshold in `year`, offered as benchmarks.
    /// Unset arguments fall back to the configured year and rating.
    pub fn high_performers(
        &self,
        year: Option<i32>,
        rating: Option<u8>,
    ) -> Result<HighPerformers, MatchingError> {
        let year = year.unwrap_or(self.config.scoring_year);
        let rating = rating.unwrap_or(self.config.benchmark_rating);

        let mut seen = HashSet::new();
        let ids: Vec<EmployeeId> = self
            .source
            .performance_roster(year)?
            .into_iter()
            .filter(|row| row.rating >= rating)
            .map(|row| row.employee_id)
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let names = if ids.is_empty() {
            HashMap::new()
        } else {
            let filter: BTreeSet<EmployeeId> = ids.iter().cloned().collect();
            self.names(Some(&filter))?
        };

        let employees = ids
            .into_iter()
            .map(|employee_id| EmployeeSummary {
                fullname: names
                    .get(&employee_id)
                    .cloned()
                    .unwrap_or_else(|| employee_id.to_string()),
                employee_id,
            })
            .collect();

        Ok(HighPerformers {
            year,
            rating,
            employees,
        })
    }

    /// Baseline over the distinct ids in `benchmark_ids`, for the configured year.
    pub fn build_baseline(&self, benchmark_ids: &[EmployeeId]) -> Result<Baseline, MatchingError> {
        self.build_baseline_for(benchmark_ids, self.config.scoring_year)
    }

    fn build_baseline_for(
        &self,
        benchmark_ids: &[EmployeeId],
        year: i32,
    ) -> Result<Baseline, MatchingError> {
        let benchmarks: BTreeSet<EmployeeId> = benchmark_ids.iter().cloned().collect();
        if benchmarks.len() < MIN_BENCHMARKS {
            return Err(MatchingError::InsufficientBenchmarks {
                selected: benchmarks.len(),
                required: MIN_BENCHMARKS,
            });
        }

        BaselineBuilder::new(self.source.as_ref(), year).build(&benchmarks)
    }

    /// Ranked results for the roster of `year`.
    pub fn score_all(
        &self,
        baseline: &Baseline,
        year: i32,
        progress: Option<&dyn ScoringProgress>,
    ) -> Result<Vec<MatchResult>, MatchingError> {
        MatchScorer::new(self.source.as_ref(), year).score_all(baseline, progress)
    }

    pub fn analyze(
        &self,
        request: AnalysisRequest,
        progress: Option<&dyn ScoringProgress>,
    ) -> Result<AnalysisReport, MatchingError> {
        self.analyze_at(request, Local::now().naive_local(), progress)
    }

    /// Runs baseline, profile generation and scoring as of `generated_at`.
    pub fn analyze_at(
        &self,
        request: AnalysisRequest,
        generated_at: NaiveDateTime,
        progress: Option<&dyn ScoringProgress>,
    ) -> Result<AnalysisReport, MatchingError> {
        let AnalysisRequest {
            role_name,
            job_level,
            role_purpose,
            benchmark_ids,
            year,
        } = request;
        let year = year.unwrap_or(self.config.scoring_year);
        let job_vacancy_id = format!("JV_{}", generated_at.format("%Y%m%d%H%M%S"));

        info!(
            %job_vacancy_id,
            year,
            benchmarks = benchmark_ids.len(),
            "starting talent analysis"
        );

        let baseline = self.build_baseline_for(&benchmark_ids, year)?;

        let profile = self.generator.generate_profile(&ProfileRequest {
            role_name: role_name.clone(),
            job_level: job_level.clone(),
            role_purpose: role_purpose.clone(),
            benchmark_count: baseline.benchmark_count,
        });

        let results = self.score_all(&baseline, year, progress)?;

        let names = self.names(None)?;
        let ranking = rank_talent(&results, &names);

        let top_ids: BTreeSet<EmployeeId> = ranking
            .iter()
            .take(STRENGTHS_SAMPLE)
            .map(|row| row.employee_id.clone())
            .collect();
        let top_competencies = self.source.competencies(year, Some(&top_ids))?;
        let insights = generate_insights(&role_name, &ranking, &top_competencies);

        info!(
            %job_vacancy_id,
            candidates = insights.candidates,
            excellent = insights.excellent_count,
            "talent analysis complete"
        );

        Ok(AnalysisReport {
            job_vacancy_id,
            generated_at,
            year,
            role_name,
            job_level,
            role_purpose,
            benchmark_ids,
            baseline_gaps: baseline.signal_gaps(),
            baseline,
            profile,
            ranking,
            insights,
        })
    }

    fn names(
        &self,
        filter: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<HashMap<EmployeeId, String>, MatchingError> {
        Ok(self
            .source
            .employees(filter)?
            .into_iter()
            .map(|employee| (employee.employee_id, employee.fullname))
            .collect())
    }
}
