use crate::ai::prompt::{estimate_tokens, TokenBudget};
use crate::ai::{Summarize, SummaryOutcome};
use crate::error::GitlogError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const COMPLETIONS_PATH: &str = "/v1/completions";

/// Client for a local LM Studio style inference server exposing the
/// OpenAI-compatible completions endpoint. Assumed to run locally; no
/// authentication is sent.
pub struct LocalClient {
    client: Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    budget: TokenBudget,
}

impl LocalClient {
    pub fn new(
        base_url: String,
        model: String,
        max_tokens: u32,
        budget: TokenBudget,
    ) -> crate::error::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_tokens,
            budget,
        })
    }

    async fn generate(&self, prompt: &str) -> crate::error::Result<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            max_tokens: self.max_tokens,
        };

        let url = format!("{}{}", self.base_url, COMPLETIONS_PATH);
        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GitlogError::inference(format!(
                "request failed with status {}: {}",
                status, error_text
            )));
        }

        let completion: CompletionResponse = response.json().await?;

        completion
            .choices
            .first()
            .map(|c| c.text.trim().to_string())
            .ok_or_else(|| GitlogError::inference("no choices in response"))
    }
}

#[async_trait]
impl Summarize for LocalClient {
    /// The caller is expected to have gated the prompt against the budget
    /// already; the bound is re-checked here and violations come back as
    /// `Overflow` without touching the model. Transport and decode
    /// failures come back as `Failed`, never as errors.
    async fn summarize(&self, prompt: &str) -> SummaryOutcome {
        if !self.budget.fits(prompt) {
            return SummaryOutcome::Overflow {
                estimated: estimate_tokens(prompt),
                budget: self.budget.summary_budget,
            };
        }

        match self.generate(prompt).await {
            Ok(text) => SummaryOutcome::Text(text),
            Err(e) => SummaryOutcome::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}
