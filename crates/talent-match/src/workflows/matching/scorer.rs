use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::baseline::Baseline;
use super::domain::{
    CompetencyRecord, EmployeeId, MatchResult, PsychometricDimension, PsychometricRecord,
    SignalGap,
};
use super::source::TalentDataSource;
use super::transform::{round2, tv_match};
use super::{DataGap, MatchingError};

/// Behavioral sub-score until a behavioral data source exists.
pub const BEHAVIORAL_PLACEHOLDER: f64 = 75.0;
/// Contextual sub-score until a contextual data source exists.
pub const CONTEXTUAL_PLACEHOLDER: f64 = 75.0;

/// Weights of the four talent group variables in the final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TgvWeights {
    pub competency: f64,
    pub psychometric: f64,
    pub behavioral: f64,
    pub contextual: f64,
}

pub const FINAL_WEIGHTS: TgvWeights = TgvWeights {
    competency: 0.50,
    psychometric: 0.25,
    behavioral: 0.20,
    contextual: 0.05,
};

impl TgvWeights {
    pub fn combine(
        &self,
        competency: f64,
        psychometric: f64,
        behavioral: f64,
        contextual: f64,
    ) -> f64 {
        competency * self.competency
            + psychometric * self.psychometric
            + behavioral * self.behavioral
            + contextual * self.contextual
    }
}

/// Observer notified after each employee is scored.
pub trait ScoringProgress {
    fn on_scored(&self, completed: usize, total: usize);
}

impl<F> ScoringProgress for F
where
    F: Fn(usize, usize),
{
    fn on_scored(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Scores the whole roster of a year against a baseline.
pub struct MatchScorer<'a, S: ?Sized> {
    source: &'a S,
    year: i32,
}

impl<'a, S> MatchScorer<'a, S>
where
    S: TalentDataSource + ?Sized,
{
    pub fn new(source: &'a S, year: i32) -> Self {
        Self { source, year }
    }

    /// Ranked match results, best first.
    ///
    /// Reads the roster, competency and psychometric tables exactly once each.
    pub fn score_all(
        &self,
        baseline: &Baseline,
        progress: Option<&dyn ScoringProgress>,
    ) -> Result<Vec<MatchResult>, MatchingError> {
        let roster = roster_ids(
            self.source
                .performance_roster(self.year)?
                .into_iter()
                .map(|row| row.employee_id),
        );
        if roster.is_empty() {
            warn!(year = self.year, "performance roster is empty");
            return Err(MatchingError::DataUnavailable(DataGap::NoRoster {
                year: self.year,
            }));
        }

        let competencies = self.source.competencies(self.year, None)?;
        let psychometrics = self.source.psychometrics(None)?;
        debug!(
            employees = roster.len(),
            competency_rows = competencies.len(),
            psychometric_rows = psychometrics.len(),
            "fetched population rows"
        );

        let mut results =
            score_population(baseline, &roster, &competencies, &psychometrics, progress);
        rank(&mut results);

        info!(year = self.year, scored = results.len(), "population scored");
        Ok(results)
    }
}

fn roster_ids(ids: impl Iterator<Item = EmployeeId>) -> Vec<EmployeeId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(id.clone())).collect()
}

/// Sorts best first. Ties keep their incoming order.
pub fn rank(results: &mut [MatchResult]) {
    results.sort_by(|a, b| b.final_match_score.total_cmp(&a.final_match_score));
}

/// Scores every roster employee from pre-fetched rows, in roster order.
pub fn score_population(
    baseline: &Baseline,
    roster: &[EmployeeId],
    competencies: &[CompetencyRecord],
    psychometrics: &[PsychometricRecord],
    progress: Option<&dyn ScoringProgress>,
) -> Vec<MatchResult> {
    let mut pillar_scores: HashMap<&EmployeeId, HashMap<&str, f64>> = HashMap::new();
    for record in competencies {
        pillar_scores
            .entry(&record.employee_id)
            .or_default()
            .entry(record.pillar_code.as_str())
            .or_insert(record.score);
    }

    let mut profiles: HashMap<&EmployeeId, &PsychometricRecord> = HashMap::new();
    for record in psychometrics {
        profiles.entry(&record.employee_id).or_insert(record);
    }

    let total = roster.len();
    roster
        .iter()
        .enumerate()
        .map(|(index, employee_id)| {
            let result = score_employee(
                baseline,
                employee_id,
                pillar_scores.get(employee_id),
                profiles.get(employee_id).copied(),
            );
            if let Some(observer) = progress {
                observer.on_scored(index + 1, total);
            }
            result
        })
        .collect()
}

fn score_employee(
    baseline: &Baseline,
    employee_id: &EmployeeId,
    pillars: Option<&HashMap<&str, f64>>,
    profile: Option<&PsychometricRecord>,
) -> MatchResult {
    let mut signal_gaps = Vec::new();

    let competency_score = competency_score(baseline, pillars, &mut signal_gaps);
    let psychometric_score = psychometric_score(baseline, profile, &mut signal_gaps);
    let final_match_score = round2(FINAL_WEIGHTS.combine(
        competency_score,
        psychometric_score,
        BEHAVIORAL_PLACEHOLDER,
        CONTEXTUAL_PLACEHOLDER,
    ));

    MatchResult {
        employee_id: employee_id.clone(),
        competency_score,
        psychometric_score,
        behavioral_score: BEHAVIORAL_PLACEHOLDER,
        contextual_score: CONTEXTUAL_PLACEHOLDER,
        final_match_score,
        signal_gaps,
    }
}

/// Unweighted mean over the pillars the employee actually has; absent pillars
/// are left out rather than counted as zero.
fn competency_score(
    baseline: &Baseline,
    pillars: Option<&HashMap<&str, f64>>,
    gaps: &mut Vec<SignalGap>,
) -> f64 {
    let mut matches = Vec::new();
    for (pillar, stats) in &baseline.competencies {
        match pillars.and_then(|scores| scores.get(pillar.as_str())) {
            Some(score) => matches.push(tv_match(*score, stats.mean, stats.std_dev)),
            None => gaps.push(SignalGap::MissingPillar(pillar.clone())),
        }
    }

    if matches.is_empty() {
        0.0
    } else {
        round2(matches.iter().sum::<f64>() / matches.len() as f64)
    }
}

/// Weighted sum of the available psychometric matches. Skipped dimensions are
/// not renormalised, so a partial profile cannot reach 100.
fn psychometric_score(
    baseline: &Baseline,
    profile: Option<&PsychometricRecord>,
    gaps: &mut Vec<SignalGap>,
) -> f64 {
    let Some(profile) = profile else {
        gaps.push(SignalGap::NoPsychometricRecord);
        return 0.0;
    };

    let mut contributions = Vec::new();
    for dimension in PsychometricDimension::ALL {
        let Some(value) = profile.value(dimension) else {
            gaps.push(SignalGap::MissingPsychometricValue(dimension));
            continue;
        };
        let Some(stats) = baseline.psychometric(dimension) else {
            continue;
        };
        contributions.push(tv_match(value, stats.mean, stats.std_dev) * dimension.weight());
    }

    if contributions.is_empty() {
        0.0
    } else {
        round2(contributions.iter().sum())
    }
}
