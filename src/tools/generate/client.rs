use super::types::*;
use super::TextGenerator;
use crate::error::{Result, RevexError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Text generator backed by an HTTP inference endpoint.
pub struct HttpGenerator {
    client: Client,
    endpoint: String,
}

impl HttpGenerator {
    pub fn new(
        endpoint: impl Into<String>,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| RevexError::Config(format!("invalid model token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RevexError::Config(format!("failed to build model client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn generate(&self, prompt: &str, max_output_tokens: usize) -> Result<String> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters::single(max_output_tokens),
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RevexError::CapabilityUnavailable(format!(
                "model endpoint returned {status}"
            )));
        }

        let candidates: Vec<GeneratedText> = response.json().await?;
        debug!(candidates = candidates.len(), "model responded");

        candidates
            .into_iter()
            .next()
            .map(|c| c.generated_text)
            .ok_or_else(|| RevexError::CapabilityUnavailable("model returned no candidates".into()))
    }
}
