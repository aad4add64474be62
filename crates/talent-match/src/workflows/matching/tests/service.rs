use std::sync::Arc;

use super::common::*;

use crate::workflows::matching::domain::MatchCategory;
use crate::workflows::matching::{
    DataGap, MatchingConfig, MatchingError, SourceError, TalentMatchService,
};
use crate::workflows::profile::{FallbackProfileGenerator, ProfileSource};

#[test]
fn high_performers_filters_by_rating_and_joins_names() {
    let service = build_service(store());

    let benchmarks = service
        .high_performers(None, None)
        .expect("lookup succeeds");
    assert_eq!((benchmarks.year, benchmarks.rating), (YEAR, 5));
    let names: Vec<(&str, &str)> = benchmarks
        .employees
        .iter()
        .map(|row| (row.employee_id.as_str(), row.fullname.as_str()))
        .collect();

    assert_eq!(
        names,
        vec![("EMP-001", "Ayu Lestari"), ("EMP-002", "Budi Santoso")]
    );
}

#[test]
fn high_performers_fall_back_to_the_id_without_a_name() {
    let service = build_service(store());

    let benchmarks = service
        .high_performers(Some(YEAR), Some(3))
        .expect("lookup succeeds");

    let employees = &benchmarks.employees;
    assert_eq!(employees.len(), 4);
    assert_eq!(employees[3].employee_id.as_str(), "EMP-004");
    assert_eq!(employees[3].fullname, "EMP-004");
}

#[test]
fn high_performers_respect_the_requested_year() {
    let service = build_service(store());

    let benchmarks = service
        .high_performers(Some(2024), None)
        .expect("lookup succeeds");

    assert_eq!(benchmarks.year, 2024);
    assert_eq!(benchmarks.employees.len(), 1);
    assert_eq!(benchmarks.employees[0].employee_id.as_str(), "EMP-003");
}

#[test]
fn fewer_than_two_distinct_benchmarks_are_rejected() {
    let service = build_service(store());

    let single = service.analyze(analysis_request(&["EMP-001"]), None);
    assert!(matches!(
        single,
        Err(MatchingError::InsufficientBenchmarks {
            selected: 1,
            required: 2
        })
    ));

    let repeated = service.build_baseline(&[id("EMP-001"), id("EMP-001")]);
    assert!(matches!(
        repeated,
        Err(MatchingError::InsufficientBenchmarks { selected: 1, .. })
    ));
}

#[test]
fn analysis_produces_a_complete_report() {
    let service = build_service(store());

    let report = service
        .analyze_at(analysis_request(&["EMP-001", "EMP-002"]), generated_at(), None)
        .expect("analysis succeeds");

    assert_eq!(report.job_vacancy_id, "JV_20251103093015");
    assert_eq!(report.export_file_name(), "talent_ranking_JV_20251103093015.csv");
    assert_eq!(report.year, YEAR);
    assert_eq!(report.baseline.benchmark_count, 2);
    assert!(report.baseline_gaps.is_empty());
    assert_eq!(report.profile.source, ProfileSource::Fallback);
    assert!(report
        .profile
        .profile
        .job_requirements
        .contains("at Middle level"));

    assert_eq!(report.ranking.len(), 5);
    assert_eq!(report.ranking[0].rank, 1);
    assert_eq!(report.ranking[0].fullname.as_deref(), Some("Ayu Lestari"));
    assert_eq!(report.ranking[0].category, MatchCategory::Excellent);

    let last = &report.ranking[4];
    assert_eq!(last.employee_id.as_str(), "EMP-005");
    assert_eq!(last.fullname, None);
    assert_eq!(last.display_name(), "Employee EMP-005");
    assert_eq!(last.category_label, "Low");
}

#[test]
fn analysis_summarises_scores_and_strengths() {
    let service = build_service(store());

    let report = service
        .analyze_at(analysis_request(&["EMP-001", "EMP-002"]), generated_at(), None)
        .expect("analysis succeeds");
    let insights = &report.insights;

    assert_eq!(insights.candidates, 5);
    assert_eq!(insights.min_score, 18.75);
    assert_eq!(insights.median_score, 71.38);
    assert_eq!(insights.excellent_count, 2);
    assert_eq!(
        insights
            .top_match
            .as_ref()
            .map(|top| top.display_name.as_str()),
        Some("Ayu Lestari")
    );
    assert_eq!(
        insights.recommendation,
        "Consider top 5 candidates for Data Analyst"
    );

    let strengths: Vec<(&str, f64)> = insights
        .top_strengths
        .iter()
        .map(|strength| (strength.pillar_code.as_str(), strength.average_score))
        .collect();
    assert_eq!(strengths, vec![("QDD", 93.75), ("GDR", 75.0)]);
}

#[test]
fn request_year_overrides_the_configured_year() {
    let service = build_service(store());
    let mut request = analysis_request(&["EMP-001", "EMP-002"]);
    request.year = Some(2024);

    let result = service.analyze(request, None);

    // EMP-001 has a 2024 QDD score so the baseline builds; the 2024 roster is EMP-003.
    let report = result.expect("analysis succeeds");
    assert_eq!(report.year, 2024);
    assert_eq!(report.ranking.len(), 1);
    assert_eq!(report.ranking[0].employee_id.as_str(), "EMP-003");
}

#[test]
fn missing_roster_fails_the_whole_run() {
    let mut store = store();
    store.performance.retain(|row| row.year != YEAR);
    let service = build_service(store);

    let result = service.analyze(analysis_request(&["EMP-001", "EMP-002"]), None);

    assert!(matches!(
        result,
        Err(MatchingError::DataUnavailable(DataGap::NoRoster { year: YEAR }))
    ));
}

#[test]
fn source_failures_surface_as_source_errors() {
    let service = build_service(UnavailableSource);

    assert!(matches!(
        service.high_performers(None, None),
        Err(MatchingError::Source(SourceError::Unavailable(_)))
    ));
    assert!(matches!(
        service.analyze(analysis_request(&["EMP-001", "EMP-002"]), None),
        Err(MatchingError::Source(_))
    ));
}

#[test]
fn analysis_reads_population_tables_in_bulk() {
    let source = Arc::new(CountingSource::new(store()));
    let service = TalentMatchService::new(
        source.clone(),
        Arc::new(FallbackProfileGenerator),
        MatchingConfig::default(),
    );

    service
        .analyze(analysis_request(&["EMP-001", "EMP-002"]), None)
        .expect("analysis succeeds");

    assert_eq!(source.calls("performance"), 1);
    assert_eq!(source.calls("psychometrics"), 2);
    assert_eq!(source.calls("employees"), 1);
    // Baseline, population, then the strengths sample.
    assert_eq!(source.calls("competencies"), 3);
}
