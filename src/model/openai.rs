//! OpenAI-compatible model host over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use super::{ChatCompletion, ModelError, ModelHost, ToolSpec};
use crate::domain::types::ChatMessage;

const DEFAULT_API_PATH: &str = "/v1/chat/completions";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Chat-completion client for OpenAI-compatible endpoints (OpenAI itself,
/// LM Studio, vLLM, and friends). Transport timeouts live on the
/// `reqwest::Client`; failures surface as [`ModelError::Network`].
#[derive(Clone)]
pub struct OpenAiModelHost {
    id: String,
    endpoint: String,
    api_path: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    http: Client,
}

impl OpenAiModelHost {
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            endpoint: endpoint.into(),
            api_path: DEFAULT_API_PATH.to_string(),
            model: model.into(),
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            http: Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn build_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = self.api_path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[async_trait]
impl ModelHost for OpenAiModelHost {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolSpec]>,
    ) -> Result<ChatCompletion, ModelError> {
        let url = self.build_url();
        let payload = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            stream: false,
            tools,
        };

        info!(
            provider = self.id.as_str(),
            model = self.model.as_str(),
            messages = messages.len(),
            tools = tools.map(<[ToolSpec]>::len).unwrap_or(0),
            "Sending chat completion request"
        );

        let mut request = self.http.post(&url).json(&payload);
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?
            .error_for_status()
            .map_err(|e| ModelError::network(&self.id, e))?
            .json::<ChatCompletion>()
            .await
            .map_err(|e| ModelError::network(&self.id, e))?;

        debug!(provider = self.id.as_str(), "Received chat completion response");
        Ok(response)
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolSpec]>,
}
