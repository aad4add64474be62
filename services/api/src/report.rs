use crate::infra::{build_service, parse_employee_id};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use talent_match::config::AppConfig;
use talent_match::error::AppError;
use talent_match::telemetry::{self, LogSink};
use talent_match::workflows::matching::report::write_ranking_csv;
use talent_match::workflows::matching::{
    AnalysisReport, AnalysisRequest, EmployeeId, HighPerformers,
};
use talent_match::workflows::profile::ProfileSource;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct BenchmarksArgs {
    /// Roster year to read ratings from (defaults to the configured scoring year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Minimum rating to qualify (defaults to the configured benchmark rating)
    #[arg(long)]
    pub(crate) rating: Option<u8>,
    /// Directory holding the talent CSV exports
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Name of the role being filled
    #[arg(long)]
    pub(crate) role_name: String,
    /// Job level, e.g. Junior, Middle, Senior
    #[arg(long)]
    pub(crate) job_level: String,
    /// One-line purpose of the role
    #[arg(long, default_value = "")]
    pub(crate) role_purpose: String,
    /// Benchmark employee ids, comma separated (at least two)
    #[arg(long, required = true, value_delimiter = ',', value_parser = parse_employee_id)]
    pub(crate) benchmarks: Vec<EmployeeId>,
    /// Scoring year (defaults to the configured scoring year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Number of ranked rows to print
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
    /// Write the full ranked table to this CSV file
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
    /// Directory holding the talent CSV exports
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

fn load_cli_config(data_dir: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(data_dir) = data_dir {
        config.data.data_dir = data_dir;
    }
    telemetry::init(&config.telemetry, LogSink::Stderr)?;
    Ok(config)
}

pub(crate) fn run_benchmarks(args: BenchmarksArgs) -> Result<(), AppError> {
    let BenchmarksArgs {
        year,
        rating,
        data_dir,
    } = args;

    let config = load_cli_config(data_dir)?;
    let service = build_service(&config.data, &config.profile)?;

    let benchmarks = service.high_performers(year, rating)?;

    let stdout = io::stdout();
    render_benchmarks(&mut stdout.lock(), &benchmarks)?;
    Ok(())
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        role_name,
        job_level,
        role_purpose,
        benchmarks,
        year,
        limit,
        export,
        data_dir,
    } = args;

    let config = load_cli_config(data_dir)?;
    let service = build_service(&config.data, &config.profile)?;

    let request = AnalysisRequest {
        role_name,
        job_level,
        role_purpose,
        benchmark_ids: benchmarks,
        year,
    };

    let report = tokio::task::spawn_blocking(move || {
        let progress = |completed: usize, total: usize| {
            if completed == total || completed % 100 == 0 {
                eprintln!("Scored {completed}/{total} employees");
            }
        };
        service.analyze(request, Some(&progress))
    })
    .await??;

    let stdout = io::stdout();
    render_analysis(&mut stdout.lock(), &report, limit)?;

    if let Some(path) = export {
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        write_ranking_csv(&mut writer, &report.ranking)?;
        writer.flush()?;
        info!(path = %path.display(), rows = report.ranking.len(), "ranking exported");
        println!("\nRanking exported to {}", path.display());
    }

    Ok(())
}

pub(crate) fn render_benchmarks<W: Write>(
    out: &mut W,
    benchmarks: &HighPerformers,
) -> io::Result<()> {
    writeln!(
        out,
        "High performers for {} (rating >= {})",
        benchmarks.year, benchmarks.rating
    )?;
    if benchmarks.employees.is_empty() {
        writeln!(out, "- none")?;
        return Ok(());
    }
    for employee in &benchmarks.employees {
        writeln!(out, "- {} ({})", employee.fullname, employee.employee_id)?;
    }
    Ok(())
}

pub(crate) fn render_analysis<W: Write>(
    out: &mut W,
    report: &AnalysisReport,
    limit: usize,
) -> io::Result<()> {
    writeln!(out, "Talent match analysis {}", report.job_vacancy_id)?;
    writeln!(
        out,
        "Role: {} ({}) | Year {} | {} benchmarks",
        report.role_name, report.job_level, report.year, report.baseline.benchmark_count
    )?;
    if !report.role_purpose.is_empty() {
        writeln!(out, "Purpose: {}", report.role_purpose)?;
    }
    for gap in &report.baseline_gaps {
        writeln!(out, "Note: {}", gap.describe())?;
    }

    let source = match report.profile.source {
        ProfileSource::Generated => "generated",
        ProfileSource::Fallback => "fallback template",
    };
    writeln!(out, "\nJob profile ({source})")?;
    writeln!(out, "Requirements\n{}", report.profile.profile.job_requirements)?;
    writeln!(out, "Description\n{}", report.profile.profile.job_description)?;
    writeln!(out, "Key competencies\n{}", report.profile.profile.key_competencies)?;

    let shown = report.top(limit);
    writeln!(
        out,
        "\nRanked talent (top {} of {})",
        shown.len(),
        report.ranking.len()
    )?;
    writeln!(
        out,
        "{:>4}  {:<28} {:>7}  {:<9} {:>7} {:>7}",
        "Rank", "Employee", "Match", "Category", "Comp", "Psych"
    )?;
    for row in shown {
        writeln!(
            out,
            "{:>4}  {:<28} {:>7.2}  {:<9} {:>7.2} {:>7.2}",
            row.rank,
            row.display_name(),
            row.final_match_score,
            row.category_label,
            row.competency_score,
            row.psychometric_score
        )?;
    }

    let insights = &report.insights;
    writeln!(out, "\nSummary")?;
    writeln!(
        out,
        "- Scores: min {:.1} | max {:.1} | mean {:.1} | median {:.1}",
        insights.min_score, insights.max_score, insights.mean_score, insights.median_score
    )?;
    writeln!(out, "- Excellent matches: {}", insights.excellent_count)?;
    if let Some(top) = &insights.top_match {
        writeln!(
            out,
            "- Top match: {} ({:.1})",
            top.display_name, top.final_match_score
        )?;
    }
    if !insights.top_strengths.is_empty() {
        let strengths: Vec<String> = insights
            .top_strengths
            .iter()
            .map(|strength| format!("{} {:.2}", strength.pillar_code, strength.average_score))
            .collect();
        writeln!(out, "- Top strengths: {}", strengths.join(", "))?;
    }
    writeln!(out, "- {}", insights.recommendation)?;
    Ok(())
}
