//! Job profile text generation.
//!
//! Scoring never depends on this module. Generators always return a profile: any
//! failure to produce generated text resolves to the deterministic fallback.

mod openrouter;

pub use openrouter::{OpenRouterProfileGenerator, ProfileError};

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Inputs describing the role being profiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub role_name: String,
    pub job_level: String,
    pub role_purpose: String,
    pub benchmark_count: usize,
}

/// Three free-text sections of a job profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProfile {
    pub job_requirements: String,
    pub job_description: String,
    pub key_competencies: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProfile {
    pub source: ProfileSource,
    #[serde(flatten)]
    pub profile: JobProfile,
}

impl GeneratedProfile {
    pub fn fallback(job_level: &str) -> Self {
        Self {
            source: ProfileSource::Fallback,
            profile: fallback_profile(job_level),
        }
    }
}

pub trait ProfileGenerator: Debug + Send + Sync {
    fn generate_profile(&self, request: &ProfileRequest) -> GeneratedProfile;
}

/// Offline generator returning the static profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProfileGenerator;

impl ProfileGenerator for FallbackProfileGenerator {
    fn generate_profile(&self, request: &ProfileRequest) -> GeneratedProfile {
        GeneratedProfile::fallback(&request.job_level)
    }
}

pub fn fallback_profile(job_level: &str) -> JobProfile {
    JobProfile {
        job_requirements: format!(
            "• 3+ years experience at {job_level} level\n• Strong analytical skills\n• Data analysis tools proficiency\n• Communication skills"
        ),
        job_description: "• Analyze data and trends\n• Develop insights and recommendations\n• Create reports and dashboards\n• Collaborate with stakeholders".to_string(),
        key_competencies: "• Analytical thinking\n• Problem-solving\n• Communication\n• Teamwork\n• Attention to detail".to_string(),
    }
}

/// Reads a profile from model output: raw JSON first, then the outermost
/// `{...}` span embedded in surrounding text.
pub fn parse_profile_content(content: &str) -> Option<JobProfile> {
    if let Ok(profile) = serde_json::from_str::<JobProfile>(content.trim()) {
        return Some(profile);
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<JobProfile>(&content[start..=end]).ok()
}
