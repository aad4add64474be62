use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    parse_profile_content, GeneratedProfile, ProfileGenerator, ProfileRequest, ProfileSource,
};
use crate::config::ProfileConfig;

const SYSTEM_PROMPT: &str = "You are an expert HR analyst. Always respond with valid JSON only.";
const REFERER: &str = "https://talent-match-app.streamlit.app";
const TITLE: &str = "Talent Match Intelligence";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1500;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("OpenRouter API key not configured")]
    MissingApiKey,
    #[error("profile runtime unavailable: {0}")]
    Runtime(String),
    #[error("OpenRouter request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("OpenRouter API error: {0}")]
    Status(u16),
    #[error("OpenRouter response had no choices")]
    EmptyResponse,
    #[error("model output did not contain a job profile")]
    UnparseableContent,
}

/// Chat-completions client for OpenRouter.
///
/// The generator is synchronous: each call spins up a current-thread runtime and
/// blocks on it, so it must not be called from inside an async task. Any failure
/// degrades to the fallback profile.
#[derive(Debug, Clone)]
pub struct OpenRouterProfileGenerator {
    config: ProfileConfig,
}

impl OpenRouterProfileGenerator {
    pub fn new(config: ProfileConfig) -> Self {
        Self { config }
    }

    pub fn try_generate(
        &self,
        request: &ProfileRequest,
    ) -> Result<super::JobProfile, ProfileError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProfileError::MissingApiKey)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| ProfileError::Runtime(err.to_string()))?;

        let content = runtime.block_on(self.complete(api_key, request))?;
        parse_profile_content(&content).ok_or(ProfileError::UnparseableContent)
    }

    async fn complete(
        &self,
        api_key: &str,
        request: &ProfileRequest,
    ) -> Result<String, ProfileError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(request),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = client
            .post(url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ProfileError::Status(status.as_u16()));
        }

        let completion: ChatCompletion = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ProfileError::EmptyResponse)
    }
}

impl ProfileGenerator for OpenRouterProfileGenerator {
    fn generate_profile(&self, request: &ProfileRequest) -> GeneratedProfile {
        match self.try_generate(request) {
            Ok(profile) => {
                info!(model = %self.config.model, "job profile generated");
                GeneratedProfile {
                    source: ProfileSource::Generated,
                    profile,
                }
            }
            Err(err) => {
                warn!(%err, "job profile generation failed; using fallback profile");
                GeneratedProfile::fallback(&request.job_level)
            }
        }
    }
}

fn build_prompt(request: &ProfileRequest) -> String {
    format!(
        "Generate a comprehensive job profile for the following position:\n\n\
**Position Details:**\n\
- Role Name: {}\n\
- Job Level: {}\n\
- Role Purpose: {}\n\
- Based on {} high-performing employees\n\n\
Provide the output in this EXACT JSON format (no markdown, just raw JSON):\n\
{{\n\
    \"job_requirements\": \"List technical skills, tools, certifications, and experience required\",\n\
    \"job_description\": \"Detailed job responsibilities, day-to-day activities, and impact\",\n\
    \"key_competencies\": \"Soft skills, behavioral traits, leadership qualities needed\"\n\
}}\n\n\
Be specific and actionable.",
        request.role_name, request.job_level, request.role_purpose, request.benchmark_count
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}
