mod export;
mod insights;
mod views;

pub use export::{export_file_name, ranking_csv, write_ranking_csv, ExportError};
pub use insights::{PillarStrength, SummaryInsights, TopMatch, SHORTLIST_SIZE, STRENGTHS_SAMPLE};
pub use views::{rank_talent, RankedTalentView};

pub(crate) use insights::generate_insights;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::baseline::Baseline;
use super::domain::{EmployeeId, SignalGap};
use crate::workflows::profile::GeneratedProfile;

/// Everything one analysis run produces, ready for the API or CLI to render.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub job_vacancy_id: String,
    pub generated_at: NaiveDateTime,
    pub year: i32,
    pub role_name: String,
    pub job_level: String,
    pub role_purpose: String,
    pub benchmark_ids: Vec<EmployeeId>,
    pub baseline: Baseline,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub baseline_gaps: Vec<SignalGap>,
    pub profile: GeneratedProfile,
    pub ranking: Vec<RankedTalentView>,
    pub insights: SummaryInsights,
}

impl AnalysisReport {
    pub fn export_file_name(&self) -> String {
        export_file_name(&self.job_vacancy_id)
    }

    pub fn ranking_csv(&self) -> Result<String, ExportError> {
        ranking_csv(&self.ranking)
    }

    /// The first `limit` rows of the ranking.
    pub fn top(&self, limit: usize) -> &[RankedTalentView] {
        &self.ranking[..limit.min(self.ranking.len())]
    }
}
