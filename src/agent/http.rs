use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;

use crate::error::LunchError;
use crate::http::{check_response, tuned_client};

/// OpenAI-compatible chat-completions client.
pub struct ChatClient {
    client: Client,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// One completion call.
pub struct ChatRequest<'a> {
    pub base_url: &'a str,
    pub api_key: &'a str,
    pub provider: &'a str,
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub prompt: &'a str,
    pub temperature: f64,
    pub deadline: Instant,
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatClient {
    pub fn new() -> Self {
        Self {
            client: tuned_client(),
        }
    }

    pub async fn complete(&self, req: &ChatRequest<'_>) -> Result<String, LunchError> {
        let provider = req.provider;

        // Check for expired deadline before making the request
        let timeout = req
            .deadline
            .checked_duration_since(Instant::now())
            .filter(|d| *d > Duration::from_millis(100))
            .ok_or(LunchError::Timeout(0))?;

        let body = serde_json::json!({
            "model": req.model,
            "temperature": req.temperature,
            "messages": [
                {"role": "system", "content": req.system_prompt},
                {"role": "user", "content": req.prompt},
            ]
        });

        let response = self
            .client
            .post(req.base_url)
            .header("Authorization", format!("Bearer {}", req.api_key))
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LunchError::Timeout(timeout.as_millis() as u64)
                } else {
                    LunchError::Request(e)
                }
            })?;

        let bytes = check_response(response, provider).await?;
        parse_completion(&bytes, provider)
    }
}

fn parse_completion(bytes: &[u8], provider: &str) -> Result<String, LunchError> {
    let completion: ChatCompletion = serde_json::from_slice(bytes)
        .map_err(|e| LunchError::SchemaParse(format!("failed to parse response: {e}")))?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LunchError::Upstream {
            provider: provider.to_string(),
            message: "empty choices or null content".to_string(),
            status: None,
        })
}
