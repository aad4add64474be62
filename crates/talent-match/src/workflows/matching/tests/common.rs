use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::workflows::matching::domain::{
    CompetencyRecord, EmployeeId, EmployeeSummary, PerformanceRecord, PsychometricRecord,
};
use crate::workflows::matching::source::{InMemoryTalentStore, SourceError, TalentDataSource};
use crate::workflows::matching::{
    talent_router, AnalysisRequest, MatchingConfig, TalentMatchService,
};
use crate::workflows::profile::FallbackProfileGenerator;

pub(super) const YEAR: i32 = 2025;

pub(super) fn id(value: &str) -> EmployeeId {
    EmployeeId::new(value)
}

pub(super) fn ids(values: &[&str]) -> BTreeSet<EmployeeId> {
    values.iter().map(|value| id(value)).collect()
}

pub(super) fn performance(employee: &str, year: i32, rating: u8) -> PerformanceRecord {
    PerformanceRecord {
        employee_id: id(employee),
        year,
        rating,
    }
}

pub(super) fn competency(employee: &str, pillar: &str, score: f64, year: i32) -> CompetencyRecord {
    CompetencyRecord {
        employee_id: id(employee),
        pillar_code: pillar.to_string(),
        score,
        year,
    }
}

pub(super) fn psych(
    employee: &str,
    pauli: Option<f64>,
    gtq: Option<f64>,
    iq: Option<f64>,
) -> PsychometricRecord {
    PsychometricRecord {
        employee_id: id(employee),
        pauli,
        gtq,
        iq,
    }
}

pub(super) fn employee(employee: &str, fullname: &str) -> EmployeeSummary {
    EmployeeSummary {
        employee_id: id(employee),
        fullname: fullname.to_string(),
    }
}

/// Five employees scored in 2025.
///
/// EMP-001 and EMP-002 are the rating-5 benchmarks and mirror each other around
/// the baseline, so they tie. EMP-003 has one far-off pillar and only a PAULI
/// score. EMP-004 lacks pillar GDR and any psychometric record. EMP-005 appears
/// only on the roster.
pub(super) fn store() -> InMemoryTalentStore {
    InMemoryTalentStore::new(
        vec![
            performance("EMP-001", YEAR, 5),
            performance("EMP-002", YEAR, 5),
            performance("EMP-003", YEAR, 4),
            performance("EMP-004", YEAR, 3),
            performance("EMP-005", YEAR, 2),
            performance("EMP-003", 2024, 5),
        ],
        vec![
            competency("EMP-001", "QDD", 80.0, YEAR),
            competency("EMP-001", "GDR", 70.0, YEAR),
            competency("EMP-002", "QDD", 90.0, YEAR),
            competency("EMP-002", "GDR", 80.0, YEAR),
            competency("EMP-003", "QDD", 120.0, YEAR),
            competency("EMP-003", "GDR", 75.0, YEAR),
            competency("EMP-004", "QDD", 85.0, YEAR),
            competency("EMP-001", "QDD", 10.0, 2024),
        ],
        vec![
            psych("EMP-001", Some(40.0), Some(20.0), Some(100.0)),
            psych("EMP-002", Some(50.0), Some(30.0), Some(120.0)),
            psych("EMP-003", Some(45.0), None, None),
        ],
        vec![
            employee("EMP-001", "Ayu Lestari"),
            employee("EMP-002", "Budi Santoso"),
            employee("EMP-003", "Citra Dewi"),
        ],
    )
}

pub(super) fn benchmark_ids() -> BTreeSet<EmployeeId> {
    ids(&["EMP-001", "EMP-002"])
}

pub(super) fn analysis_request(benchmarks: &[&str]) -> AnalysisRequest {
    AnalysisRequest {
        role_name: "Data Analyst".to_string(),
        job_level: "Middle".to_string(),
        role_purpose: "Turn operational data into weekly decisions".to_string(),
        benchmark_ids: benchmarks.iter().map(|value| id(value)).collect(),
        year: None,
    }
}

pub(super) fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 3)
        .and_then(|date| date.and_hms_opt(9, 30, 15))
        .expect("valid timestamp")
}

pub(super) fn build_service<S>(source: S) -> TalentMatchService<S>
where
    S: TalentDataSource,
{
    TalentMatchService::new(
        Arc::new(source),
        Arc::new(FallbackProfileGenerator),
        MatchingConfig::default(),
    )
}

pub(super) fn router_with_store(store: InMemoryTalentStore) -> Router {
    talent_router(Arc::new(build_service(store)))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("valid json")
}

/// Wraps the in-memory store and counts calls per table.
#[derive(Default)]
pub(super) struct CountingSource {
    inner: InMemoryTalentStore,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl CountingSource {
    pub(super) fn new(inner: InMemoryTalentStore) -> Self {
        Self {
            inner,
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub(super) fn calls(&self, table: &str) -> usize {
        self.calls
            .lock()
            .expect("counter mutex poisoned")
            .get(table)
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, table: &'static str) {
        *self
            .calls
            .lock()
            .expect("counter mutex poisoned")
            .entry(table)
            .or_insert(0) += 1;
    }
}

impl TalentDataSource for CountingSource {
    fn performance_roster(&self, year: i32) -> Result<Vec<PerformanceRecord>, SourceError> {
        self.record("performance");
        self.inner.performance_roster(year)
    }

    fn competencies(
        &self,
        year: i32,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<CompetencyRecord>, SourceError> {
        self.record("competencies");
        self.inner.competencies(year, employees)
    }

    fn psychometrics(
        &self,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<PsychometricRecord>, SourceError> {
        self.record("psychometrics");
        self.inner.psychometrics(employees)
    }

    fn employees(
        &self,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<EmployeeSummary>, SourceError> {
        self.record("employees");
        self.inner.employees(employees)
    }
}

/// Source whose every read fails.
pub(super) struct UnavailableSource;

impl TalentDataSource for UnavailableSource {
    fn performance_roster(&self, _year: i32) -> Result<Vec<PerformanceRecord>, SourceError> {
        Err(offline())
    }

    fn competencies(
        &self,
        _year: i32,
        _employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<CompetencyRecord>, SourceError> {
        Err(offline())
    }

    fn psychometrics(
        &self,
        _employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<PsychometricRecord>, SourceError> {
        Err(offline())
    }

    fn employees(
        &self,
        _employees: Option<&BTreeSet<EmployeeId>>,
    ) -> Result<Vec<EmployeeSummary>, SourceError> {
        Err(offline())
    }
}

fn offline() -> SourceError {
    SourceError::Unavailable("warehouse offline".to_string())
}
