use std::collections::BTreeSet;

use super::domain::{
    CompetencyRecord, EmployeeId, EmployeeSummary, PerformanceRecord, PsychometricRecord,
};

/// Read-only access to the tables feeding an analysis run.
///
/// Every method is a single bulk read. Callers fetch each table once per run and
/// index the rows in memory instead of querying per employee.
pub trait TalentDataSource: Send + Sync {
    fn performance_roster(&self, year: i32) -> Result<Vec<PerformanceRecord>, SourceError>;

    /// Competency rows for `year`, restricted to `employees` when given.
    fn competencies(
        &self,
        year: i32,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<CompetencyRecord>, SourceError>;

    fn psychometrics(
        &self,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<PsychometricRecord>, SourceError>;

    fn employees(
        &self,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<EmployeeSummary>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error("table {table} could not be read: {detail}")]
    Table { table: &'static str, detail: String },
}

/// Snapshot of the four tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTalentStore {
    pub performance: Vec<PerformanceRecord>,
    pub competencies: Vec<CompetencyRecord>,
    pub psychometrics: Vec<PsychometricRecord>,
    pub employees: Vec<EmployeeSummary>,
}

impl InMemoryTalentStore {
    pub fn new(
        performance: Vec<PerformanceRecord>,
        competencies: Vec<CompetencyRecord>,
        psychometrics: Vec<PsychometricRecord>,
        employees: Vec<EmployeeSummary>,
    ) -> Self {
        Self {
            performance,
            competencies,
            psychometrics,
            employees,
        }
    }
}

fn selected(filter: Option<&BTreeSet<EmployeeId>>, id: &EmployeeId) -> bool {
    filter.map(|ids| ids.contains(id)).unwrap_or(true)
}

impl TalentDataSource for InMemoryTalentStore {
    fn performance_roster(&self, year: i32) -> Result<Vec<PerformanceRecord>, SourceError> {
        Ok(self
            .performance
            .iter()
            .filter(|row| row.year == year)
            .cloned()
            .collect())
    }

    fn competencies(
        &self,
        year: i32,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<CompetencyRecord>, SourceError> {
        Ok(self
            .competencies
            .iter()
            .filter(|row| row.year == year && selected(employees, &row.employee_id))
            .cloned()
            .collect())
    }

    fn psychometrics(
        &self,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<PsychometricRecord>, SourceError> {
        Ok(self
            .psychometrics
            .iter()
            .filter(|row| selected(employees, &row.employee_id))
            .cloned()
            .collect())
    }

    fn employees(
        &self,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<EmployeeSummary>, SourceError> {
        Ok(self
            .employees
            .iter()
            .filter(|row| selected(employees, &row.employee_id))
            .cloned()
            .collect())
    }
}
