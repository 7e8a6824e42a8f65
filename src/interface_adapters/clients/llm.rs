use serde::{Deserialize, Serialize};
use std::time::Duration;

// Completion request/response consumed by the command router.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

#[derive(Debug)]
pub enum LlmError {
    UpstreamUnavailable,
    MalformedResponse,
}

// Thin reqwest client for the language-model completion endpoint.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Free-form chat: the raw completion for `text`.
    pub async fn chat(&self, text: &str) -> Result<String, LlmError> {
        self.complete(text).await
    }

    /// Sends a choice prompt and matches the trimmed completion against the
    /// label set. Anything else resolves to `None`.
    pub async fn classify(
        &self,
        prompt: &str,
        choices: &[&'static str],
    ) -> Result<Option<&'static str>, LlmError> {
        let content = self.complete(prompt).await?;
        let answer = content.trim();
        Ok(choices
            .iter()
            .copied()
            .find(|choice| answer.eq_ignore_ascii_case(choice)))
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/completion", self.base_url);
        let response = self
            .http
            .post(url)
            .json(&CompletionRequest { prompt })
            .send()
            .await
            .map_err(|_| LlmError::UpstreamUnavailable)?;

        if !response.status().is_success() {
            return Err(LlmError::UpstreamUnavailable);
        }

        let body = response
            .json::<CompletionResponse>()
            .await
            .map_err(|_| LlmError::MalformedResponse)?;
        Ok(body.content)
    }
}
