use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use crate::config::Config;
use crate::models::Mode;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("completion API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("unexpected completion response: {0}")]
    Parse(String),
}

/// Anything that maps a caller payload to raw generated text. The production
/// implementation talks to a completion API; tests substitute fixed outputs.
#[async_trait]
pub trait PlaceholderGenerator: Send + Sync {
    async fn generate_placeholder(
        &self,
        payload: &str,
        mode: Mode,
        api_key: &str,
    ) -> Result<String, CompletionError>;
}

/// Builds the instruction prompt sent to the model. In code mode the caller's
/// component source is embedded verbatim; in image mode the payload is a URL
/// that travels as an image part of the message instead.
pub fn build_prompt(payload: &str, mode: Mode) -> String {
    let mut prompt = String::from(
        "Write a React component that renders an animated loading placeholder (skeleton) \
         version of the UI described below, styled with Tailwind CSS utility classes.\n\
         Use only two colors: gray-200 for the skeleton elements and white for the background.\n\
         Do not add any imports and do not create any additional components.\n\
         The placeholder component must be the default export.\n\
         Reply with a single code block and nothing else.\n",
    );
    match mode {
        Mode::Code => {
            prompt.push_str("\nComponent source:\n");
            prompt.push_str(payload);
            prompt.push('\n');
        }
        Mode::Image => {
            prompt.push_str(
                "\nThe attached image shows the UI to reproduce. Infer the layout and the \
                 number of skeleton elements from the image.\n",
            );
        }
    }
    prompt
}

pub struct CompletionGenerator {
    client: Client,
    base_url: String,
    model: String,
    max_output_tokens: u32,
}

impl CompletionGenerator {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("failed to build completion HTTP client")?;
        Ok(Self {
            client,
            base_url: config.completion_base_url.clone(),
            model: config.completion_model.clone(),
            max_output_tokens: config.max_output_tokens,
        })
    }
}

#[async_trait]
impl PlaceholderGenerator for CompletionGenerator {
    async fn generate_placeholder(
        &self,
        payload: &str,
        mode: Mode,
        api_key: &str,
    ) -> Result<String, CompletionError> {
        let prompt = build_prompt(payload, mode);

        // Code mode sends a single prompt string; image mode sends a
        // structured content list so the model can look at the screenshot.
        let content = match mode {
            Mode::Code => json!(prompt),
            Mode::Image => json!([
                { "type": "text", "text": prompt },
                { "type": "image_url", "image_url": { "url": payload } },
            ]),
        };

        let request_body = json!({
            "model": self.model,
            "temperature": 0,
            "max_tokens": self.max_output_tokens,
            "messages": [{ "role": "user", "content": content }],
        });

        info!(
            "🎯 Requesting placeholder generation ({:?} mode, {} byte payload)",
            mode,
            payload.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key.trim())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| CompletionError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Completion API error: status={} body={}", status, body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Parse("no choices in response".to_string()))?;

        info!("✅ Model returned {} bytes of text", text.len());
        Ok(text)
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_prompt_embeds_the_payload_verbatim() {
        let source = "const Card = () => <div className=\"p-4 shadow\">hello</div>;";
        let prompt = build_prompt(source, Mode::Code);
        assert!(prompt.contains(source));
        assert!(prompt.contains("gray-200"));
        assert!(prompt.contains("white"));
        assert!(prompt.contains("default export"));
        assert!(prompt.contains("Do not add any imports"));
    }

    #[test]
    fn image_prompt_asks_for_layout_inference() {
        let prompt = build_prompt("https://example.com/ui.png", Mode::Image);
        assert!(prompt.contains("Infer the layout"));
        // The URL travels as an image part of the message, not as prompt text.
        assert!(!prompt.contains("https://example.com/ui.png"));
    }
}
