use std::time::Duration;

use async_trait::async_trait;
use kaiseki_config::vision::VisionConfig;
use reqwest::StatusCode;

use crate::wire::{ChatRequest, ChatResponse, ErrorResponse};
use crate::{ProviderMetadata, QueryResult, VisionError, VisionQuery};

/// OpenAI-style `chat/completions` client with image input
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    prompt: String,
}

impl ChatCompletionClient {
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }

        Ok(Self {
            client: builder.build()?,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            prompt: config.prompt.clone(),
        })
    }
}

#[async_trait]
impl VisionQuery for ChatCompletionClient {
    async fn query(&self, image_b64: &str) -> Result<QueryResult, VisionError> {
        let request = ChatRequest::with_image(&self.model, &self.prompt, image_b64);

        tracing::debug!(
            "POST {} (model {}, {} bytes of base64)",
            self.api_url,
            self.model,
            image_b64.len()
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("Vision endpoint answered {} ({} bytes)", status, body.len());
        interpret_response(status, &body)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            model: self.model.clone(),
            endpoint: self.api_url.clone(),
        }
    }
}

/// Map status and body to a result; only a broken 200 body is an error
fn interpret_response(status: StatusCode, body: &str) -> Result<QueryResult, VisionError> {
    if status != StatusCode::OK {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .and_then(|e| e.message);

        tracing::warn!(
            "Vision request rejected with {}: {}",
            status,
            message.as_deref().unwrap_or("no message")
        );

        return Ok(QueryResult::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| VisionError::MalformedResponse(format!("Failed to parse response: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| QueryResult::Answer(choice.message.content))
        .ok_or_else(|| VisionError::MalformedResponse("No choices in response".to_string()))
}
