use std::io::Write;

use serde::Serialize;

use super::views::RankedTalentView;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write ranking CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush ranking CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("ranking CSV was not valid UTF-8")]
    Encoding,
}

#[derive(Serialize)]
struct RankingRow<'a> {
    employee_id: &'a str,
    fullname: &'a str,
    final_match_score: f64,
    category: &'a str,
    competency_score: f64,
    psychometric_score: f64,
    behavioral_score: f64,
    contextual_score: f64,
}

pub fn export_file_name(job_vacancy_id: &str) -> String {
    format!("talent_ranking_{job_vacancy_id}.csv")
}

/// Writes the full ranked table, header first, in rank order.
pub fn write_ranking_csv<W: Write>(
    writer: W,
    ranking: &[RankedTalentView],
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in ranking {
        csv_writer.serialize(RankingRow {
            employee_id: row.employee_id.as_str(),
            fullname: row.fullname.as_deref().unwrap_or_default(),
            final_match_score: row.final_match_score,
            category: row.category_label,
            competency_score: row.competency_score,
            psychometric_score: row.psychometric_score,
            behavioral_score: row.behavioral_score,
            contextual_score: row.contextual_score,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn ranking_csv(ranking: &[RankedTalentView]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_ranking_csv(&mut buffer, ranking)?;
    String::from_utf8(buffer).map_err(|_| ExportError::Encoding)
}
