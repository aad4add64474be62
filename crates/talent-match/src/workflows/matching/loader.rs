use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use super::domain::{
    CompetencyRecord, EmployeeId, EmployeeSummary, PerformanceRecord, PsychometricRecord,
};
use super::source::InMemoryTalentStore;

pub const PERFORMANCE_FILE: &str = "performance_yearly.csv";
pub const COMPETENCIES_FILE: &str = "competencies_yearly.csv";
pub const PSYCHOMETRICS_FILE: &str = "profiles_psych.csv";
pub const EMPLOYEES_FILE: &str = "employees.csv";

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid {table} data: {source}")]
    Csv {
        table: &'static str,
        source: csv::Error,
    },
}

/// Loads the four talent tables from CSV exports in `dir`.
///
/// The roster and competency files are required. The psychometric and employee
/// files may be absent, which leaves those tables empty.
pub fn load_store_from_dir<P: AsRef<Path>>(dir: P) -> Result<InMemoryTalentStore, LoaderError> {
    let dir = dir.as_ref();

    let performance = read_table(
        &open_required(&dir.join(PERFORMANCE_FILE))?,
        "performance",
        parse_performance,
    )?;
    let competencies = read_table(
        &open_required(&dir.join(COMPETENCIES_FILE))?,
        "competencies",
        parse_competencies,
    )?;
    let psychometrics = match open_optional(&dir.join(PSYCHOMETRICS_FILE))? {
        Some(file) => read_table(&file, "psychometrics", parse_psychometrics)?,
        None => Vec::new(),
    };
    let employees = match open_optional(&dir.join(EMPLOYEES_FILE))? {
        Some(file) => read_table(&file, "employees", parse_employees)?,
        None => Vec::new(),
    };

    debug!(
        dir = %dir.display(),
        performance = performance.len(),
        competencies = competencies.len(),
        psychometrics = psychometrics.len(),
        employees = employees.len(),
        "loaded talent tables"
    );

    Ok(InMemoryTalentStore::new(
        performance,
        competencies,
        psychometrics,
        employees,
    ))
}

fn open_required(path: &Path) -> Result<File, LoaderError> {
    File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn open_optional(path: &Path) -> Result<Option<File>, LoaderError> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "optional table missing; treating as empty");
            Ok(None)
        }
        Err(source) => Err(LoaderError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_table<R, T>(
    reader: R,
    table: &'static str,
    parse: fn(R) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, LoaderError> {
    parse(reader).map_err(|source| LoaderError::Csv { table, source })
}

fn deserialize_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<T>()
        .collect()
}

pub fn parse_performance<R: Read>(reader: R) -> Result<Vec<PerformanceRecord>, csv::Error> {
    deserialize_rows::<_, PerformanceRow>(reader).map(|rows| {
        rows.into_iter()
            .map(|row| PerformanceRecord {
                employee_id: EmployeeId(row.employee_id),
                year: row.year,
                rating: row.rating,
            })
            .collect()
    })
}

/// Rows without a usable score are dropped, so they never reach a baseline.
pub fn parse_competencies<R: Read>(reader: R) -> Result<Vec<CompetencyRecord>, csv::Error> {
    let rows = deserialize_rows::<_, CompetencyRow>(reader)?;
    let total = rows.len();
    let records: Vec<CompetencyRecord> = rows
        .into_iter()
        .filter_map(|row| {
            row.score.map(|score| CompetencyRecord {
                employee_id: EmployeeId(row.employee_id),
                pillar_code: row.pillar_code,
                score,
                year: row.year,
            })
        })
        .collect();

    if records.len() < total {
        debug!(dropped = total - records.len(), "skipped competency rows without a score");
    }
    Ok(records)
}

pub fn parse_psychometrics<R: Read>(reader: R) -> Result<Vec<PsychometricRecord>, csv::Error> {
    deserialize_rows::<_, PsychometricRow>(reader).map(|rows| {
        rows.into_iter()
            .map(|row| PsychometricRecord {
                employee_id: EmployeeId(row.employee_id),
                pauli: row.pauli,
                gtq: row.gtq,
                iq: row.iq,
            })
            .collect()
    })
}

pub fn parse_employees<R: Read>(reader: R) -> Result<Vec<EmployeeSummary>, csv::Error> {
    deserialize_rows::<_, EmployeeRow>(reader).map(|rows| {
        rows.into_iter()
            .map(|row| EmployeeSummary {
                employee_id: EmployeeId(row.employee_id),
                fullname: row.fullname,
            })
            .collect()
    })
}

#[derive(Debug, Deserialize)]
struct PerformanceRow {
    employee_id: String,
    year: i32,
    rating: u8,
}

#[derive(Debug, Deserialize)]
struct CompetencyRow {
    employee_id: String,
    pillar_code: String,
    #[serde(default, deserialize_with = "optional_measurement")]
    score: Option<f64>,
    year: i32,
}

#[derive(Debug, Deserialize)]
struct PsychometricRow {
    employee_id: String,
    #[serde(default, deserialize_with = "optional_measurement")]
    pauli: Option<f64>,
    #[serde(default, deserialize_with = "optional_measurement")]
    gtq: Option<f64>,
    #[serde(default, deserialize_with = "optional_measurement")]
    iq: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    employee_id: String,
    fullname: String,
}

/// Empty cells and `NaN`/`null` markers become `None`.
fn optional_measurement<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
    {
        return Ok(None);
    }

    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(serde::de::Error::custom)
}
