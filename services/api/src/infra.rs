use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_match::config::{DataConfig, ProfileConfig};
use talent_match::error::AppError;
use talent_match::workflows::matching::{
    load_store_from_dir, EmployeeId, InMemoryTalentStore, MatchingConfig, TalentMatchService,
};
use talent_match::workflows::profile::{
    FallbackProfileGenerator, OpenRouterProfileGenerator, ProfileGenerator,
};
use tracing::{info, warn};

pub(crate) type SharedService = Arc<TalentMatchService<InMemoryTalentStore>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// OpenRouter when a key is configured, the offline fallback otherwise.
pub(crate) fn profile_generator(config: &ProfileConfig) -> Arc<dyn ProfileGenerator> {
    if config.api_key.is_some() {
        info!(model = %config.model, "using OpenRouter job profile generator");
        Arc::new(OpenRouterProfileGenerator::new(config.clone()))
    } else {
        warn!("OPENROUTER_API_KEY not set; job profiles use the fallback template");
        Arc::new(FallbackProfileGenerator)
    }
}

pub(crate) fn load_store(data_dir: &Path) -> Result<InMemoryTalentStore, AppError> {
    let store = load_store_from_dir(data_dir)?;
    info!(
        data_dir = %data_dir.display(),
        roster_rows = store.performance.len(),
        competency_rows = store.competencies.len(),
        "talent data loaded"
    );
    Ok(store)
}

pub(crate) fn build_service(
    data: &DataConfig,
    profile: &ProfileConfig,
) -> Result<SharedService, AppError> {
    let store = load_store(&data.data_dir)?;
    Ok(Arc::new(TalentMatchService::new(
        Arc::new(store),
        profile_generator(profile),
        MatchingConfig::from(data),
    )))
}

pub(crate) fn parse_employee_id(raw: &str) -> Result<EmployeeId, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("employee id must not be empty".to_string());
    }
    Ok(EmployeeId::new(trimmed))
}
