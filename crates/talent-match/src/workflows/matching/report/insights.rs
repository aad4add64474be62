use std::collections::BTreeMap;

use serde::Serialize;

use super::super::domain::{CompetencyRecord, MatchCategory};
use super::super::transform::round2;
use super::views::RankedTalentView;

/// How many top-ranked employees feed the strengths chart.
pub const STRENGTHS_SAMPLE: usize = 10;
/// How many top candidates the recommendation points at.
pub const SHORTLIST_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMatch {
    pub employee_id: String,
    pub display_name: String,
    pub final_match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarStrength {
    pub pillar_code: String,
    pub average_score: f64,
}

/// Headline statistics over the final scores of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryInsights {
    pub candidates: usize,
    pub min_score: f64,
    pub max_score: f64,
    pub mean_score: f64,
    pub median_score: f64,
    pub excellent_count: usize,
    pub top_match: Option<TopMatch>,
    pub top_strengths: Vec<PillarStrength>,
    pub recommendation: String,
}

/// `top_competencies` holds the scoring-year rows of the top
/// [`STRENGTHS_SAMPLE`] ranked employees.
pub(crate) fn generate_insights(
    role_name: &str,
    ranking: &[RankedTalentView],
    top_competencies: &[CompetencyRecord],
) -> SummaryInsights {
    let mut scores: Vec<f64> = ranking.iter().map(|row| row.final_match_score).collect();
    scores.sort_by(f64::total_cmp);

    let candidates = scores.len();
    let (min_score, max_score, mean_score, median_score) = if candidates == 0 {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        let mean = scores.iter().sum::<f64>() / candidates as f64;
        let median = if candidates % 2 == 1 {
            scores[candidates / 2]
        } else {
            (scores[candidates / 2 - 1] + scores[candidates / 2]) / 2.0
        };
        (scores[0], scores[candidates - 1], round2(mean), round2(median))
    };

    let excellent_count = ranking
        .iter()
        .filter(|row| row.category == MatchCategory::Excellent)
        .count();

    let top_match = ranking.first().map(|row| TopMatch {
        employee_id: row.employee_id.to_string(),
        display_name: row.display_name(),
        final_match_score: row.final_match_score,
    });

    SummaryInsights {
        candidates,
        min_score,
        max_score,
        mean_score,
        median_score,
        excellent_count,
        top_match,
        top_strengths: top_strengths(top_competencies),
        recommendation: format!("Consider top {SHORTLIST_SIZE} candidates for {role_name}"),
    }
}

/// Average score per pillar, strongest first.
fn top_strengths(rows: &[CompetencyRecord]) -> Vec<PillarStrength> {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = totals.entry(row.pillar_code.as_str()).or_insert((0.0, 0));
        entry.0 += row.score;
        entry.1 += 1;
    }

    let mut strengths: Vec<PillarStrength> = totals
        .into_iter()
        .map(|(pillar, (sum, count))| PillarStrength {
            pillar_code: pillar.to_string(),
            average_score: round2(sum / count as f64),
        })
        .collect();
    strengths.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    strengths
}
