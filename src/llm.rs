use crate::analysis::SYSTEM_PROMPT;
use crate::config::AiConfig;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Produces narrative advice for a prompt.
#[async_trait]
pub trait Analyst: Send + Sync {
    async fn analyze(&self, prompt: &str) -> Result<String>;
}

/// Client for an OpenAI-compatible chat-completion endpoint.
pub struct ChatClient {
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl ChatClient {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("weight_log/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .context("failed to build AI HTTP client")?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }
}

#[async_trait]
impl Analyst for ChatClient {
    async fn analyze(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("AI request to {} failed", self.endpoint))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("failed to read AI response body")?;
        if !status.is_success() {
            bail!("AI endpoint returned {status}: {text}");
        }

        parse_completion(&text)
    }
}

fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).context("AI response is not a chat completion")?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| anyhow!("AI response has no message content"))?;

    let content = strip_reasoning(&content).trim().to_string();
    if content.is_empty() {
        bail!("AI response content is empty");
    }
    Ok(content)
}

// Some reasoning models prepend a <think>...</think> section.
fn strip_reasoning(content: &str) -> &str {
    match content.find("</think>") {
        Some(end) if content.trim_start().starts_with("<think>") => {
            &content[end + "</think>".len()..]
        }
        _ => content,
    }
}
