use super::Summarizer;
use crate::config::Config;
use crate::error::{BriefError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// One hosted Gemini model behind the `generateContent` endpoint.
pub struct GeminiSummarizer {
    agent: ureq::Agent,
    url: String,
    model: String,
    api_key: String,
    prompt: String,
    generation: GenerationConfig,
    input_char_limit: usize,
    pacing: Duration,
}

impl GeminiSummarizer {
    pub fn new(cfg: &Config, model: &str) -> Result<Self> {
        let p = &cfg.provider;
        let api_key = std::env::var(&p.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                BriefError::configuration(format!("{} is not set", p.api_key_env))
            })?;

        let agent_cfg = ureq::Agent::config_builder()
            .timeout_global((p.timeout_seconds > 0).then(|| Duration::from_secs(p.timeout_seconds)))
            .http_status_as_error(false)
            .build();

        let model = model.trim_start_matches("models/").to_string();
        Ok(Self {
            agent: ureq::Agent::new_with_config(agent_cfg),
            url: format!(
                "{}/models/{}:generateContent",
                p.endpoint.trim_end_matches('/'),
                model
            ),
            model,
            api_key,
            prompt: p.prompt.clone(),
            generation: GenerationConfig {
                temperature: p.temperature,
                top_p: p.top_p,
                top_k: p.top_k,
                max_output_tokens: p.max_output_tokens,
            },
            input_char_limit: p.input_char_limit,
            pacing: Duration::from_millis(p.call_delay_ms),
        })
    }
}

/// Fills `{max_length}` and `{text}`; text beyond `input_char_limit` characters is dropped.
pub fn render_prompt(template: &str, text: &str, target_words: usize, input_char_limit: usize) -> String {
    let text: String = if input_char_limit > 0 {
        text.chars().take(input_char_limit).collect()
    } else {
        text.to_string()
    };
    template
        .replace("{max_length}", &target_words.to_string())
        .replace("{text}", &text)
}

impl Summarizer for GeminiSummarizer {
    fn name(&self) -> &str {
        &self.model
    }

    fn summarize(&self, text: &str, target_words: usize) -> Result<String> {
        if text.trim().is_empty() {
            return Err(BriefError::summarization("no text to summarize"));
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: Some(render_prompt(
                        &self.prompt,
                        text,
                        target_words,
                        self.input_char_limit,
                    )),
                }],
            }],
            generation_config: self.generation.clone(),
        };

        debug!(
            "gemini {} request chars={} target_words={}",
            self.model,
            text.chars().count(),
            target_words
        );

        let mut resp = self
            .agent
            .post(self.url.as_str())
            .header("x-goog-api-key", self.api_key.as_str())
            .send_json(&request)
            .map_err(|e| BriefError::summarization(format!("{}: request failed: {e}", self.model)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.body_mut().read_to_string().unwrap_or_default();
            return Err(BriefError::summarization(format!(
                "{}: HTTP {}: {}",
                self.model,
                status.as_u16(),
                body.trim()
            )));
        }

        let parsed: GenerateContentResponse = resp.body_mut().read_json().map_err(|e| {
            BriefError::summarization(format!("{}: invalid response: {e}", self.model))
        })?;

        let summary = parsed.first_text();
        if summary.trim().is_empty() {
            return Err(BriefError::summarization(format!(
                "{}: empty response",
                self.model
            )));
        }
        Ok(summary.trim().to_string())
    }

    fn pacing(&self) -> Duration {
        self.pacing
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn first_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}
