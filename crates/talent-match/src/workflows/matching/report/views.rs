use std::collections::HashMap;

use serde::Serialize;

use super::super::domain::{EmployeeId, MatchCategory, MatchResult};

/// One row of the ranked talent table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTalentView {
    pub rank: usize,
    pub employee_id: EmployeeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    pub final_match_score: f64,
    pub category: MatchCategory,
    pub category_label: &'static str,
    pub competency_score: f64,
    pub psychometric_score: f64,
    pub behavioral_score: f64,
    pub contextual_score: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub signal_gaps: Vec<String>,
}

impl RankedTalentView {
    pub fn display_name(&self) -> String {
        match &self.fullname {
            Some(name) => name.clone(),
            None => format!("Employee {}", self.employee_id),
        }
    }
}

/// Joins names onto already ranked results, keeping their order.
pub fn rank_talent(
    results: &[MatchResult],
    names: &HashMap<EmployeeId, String>,
) -> Vec<RankedTalentView> {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let category = result.category();
            RankedTalentView {
                rank: index + 1,
                employee_id: result.employee_id.clone(),
                fullname: names.get(&result.employee_id).cloned(),
                final_match_score: result.final_match_score,
                category,
                category_label: category.label(),
                competency_score: result.competency_score,
                psychometric_score: result.psychometric_score,
                behavioral_score: result.behavioral_score,
                contextual_score: result.contextual_score,
                signal_gaps: result.signal_gaps.iter().map(|gap| gap.describe()).collect(),
            }
        })
        .collect()
}
