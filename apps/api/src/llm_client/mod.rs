/// LLM Client — the single point of entry for all generative model calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions go through `GenerativeModel`, implemented here by `LlmClient`.
///
/// Model: gemini-2.0-flash-001 (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all structured-output calls.
pub const MODEL: &str = "gemini-2.0-flash-001";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Response does not match schema: {0}")]
    Schema(String),
}

/// One structured-output request: the reply must be JSON conforming to `schema`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRequest {
    pub system: String,
    pub prompt: String,
    /// OpenAPI-subset schema understood by `responseSchema`.
    pub schema: Value,
}

/// Anything that can answer a structured-output request.
/// `AppState` carries an `Arc<dyn GenerativeModel>`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Returns the raw JSON reply. No retries.
    async fn generate(&self, request: &StructuredRequest) -> Result<Value, LlmError>;
}

/// Calls the model and deserializes its reply into `T`.
pub async fn generate_object<T: DeserializeOwned>(
    model: &dyn GenerativeModel,
    request: &StructuredRequest,
) -> Result<T, LlmError> {
    let value = model.generate(request).await?;
    serde_json::from_value(value).map_err(|e| LlmError::Schema(e.to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client with JSON-schema output.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
        })
    }

    /// Makes a single call to the Gemini API, returning the full response object.
    pub async fn call(&self, request: &StructuredRequest) -> Result<LlmResponse, LlmError> {
        let request_body = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: &request.system,
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.schema,
            },
        };

        let response = self
            .client
            .post(format!("{GEMINI_API_BASE}/{MODEL}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl GenerativeModel for LlmClient {
    async fn generate(&self, request: &StructuredRequest) -> Result<Value, LlmError> {
        let response = self.call(request).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        parse_json_reply(&text)
    }
}

/// Parses a JSON reply, tolerating markdown code fences around it.
fn parse_json_reply(text: &str) -> Result<Value, LlmError> {
    Ok(serde_json::from_str(strip_json_fences(text))?)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    stripped
        .trim_start()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(stripped.trim_start())
}
