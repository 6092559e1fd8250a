//! Google Gemini gateway over the `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ImageAttachment, ModelGateway};
use crate::error::GatewayError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Longest instruction the gateway forwards, in characters.
pub const MAX_INSTRUCTION_CHARS: usize = 100_000;

/// Connection settings for [`GeminiGateway`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

pub struct GeminiGateway {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        // A blank key is as good as none.
        let api_key = config.api_key.filter(|key| !key.trim().is_empty());

        Ok(Self {
            client,
            api_key,
            endpoint,
            model: config.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(instruction: &str, images: &[ImageAttachment]) -> GenerateRequest {
        let mut parts = vec![Part::Text {
            text: instruction.to_string(),
        }];
        parts.extend(images.iter().map(|image| Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type().to_string(),
                data: image.data().to_string(),
            },
        }));

        GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        }
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    fn check_configured(&self) -> Result<(), GatewayError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(GatewayError::MissingApiKey),
        }
    }

    async fn generate(
        &self,
        instruction: &str,
        images: &[ImageAttachment],
    ) -> Result<String, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::MissingApiKey)?;

        let len = instruction.chars().count();
        if instruction.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("instruction is empty".into()));
        }
        if len > MAX_INSTRUCTION_CHARS {
            return Err(GatewayError::InvalidRequest(format!(
                "instruction is {len} characters, maximum is {MAX_INSTRUCTION_CHARS}"
            )));
        }

        tracing::debug!(
            model = %self.model,
            instruction_chars = len,
            images = images.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&Self::build_request(instruction, images))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GatewayError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::UnexpectedResponse(format!("{e}: {body}")))?;
        extract_text(parsed)
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, GatewayError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::UnexpectedResponse("no candidates in response".into()))?;

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(GatewayError::UnexpectedResponse(format!(
            "candidate has no text (finish reason: {reason})"
        )));
    }
    Ok(text)
}

// Wire types

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
