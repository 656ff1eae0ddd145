//! Book blurbs for the detail view.
//!
//! Generation is pluggable: a [`SummaryGenerator`] (normally a chat-completion
//! endpoint) is tried first and [`TemplateSummary`] fills in whenever no
//! generator is configured or the generator fails.

use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::models::BookRecord;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const EMPTY_COMPLETION: &str = "Unable to generate summary.";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates concise, engaging book summaries. Keep summaries under 150 words and make them interesting for readers.";
const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, book: &BookRecord) -> Result<String>;
}

fn authors_or_unknown(book: &BookRecord) -> String {
    book.authors_line()
        .unwrap_or_else(|| "Unknown Author".to_string())
}

pub fn summary_prompt(book: &BookRecord) -> String {
    format!(
        "Generate a brief summary for the book \"{}\" by {}. Genre: {}. Published: {}.",
        book.title,
        authors_or_unknown(book),
        book.primary_subject().unwrap_or("Fiction"),
        book.first_publish_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "Unknown year".to_string()),
    )
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Chat-completion client (OpenAI-compatible request and response shape).
pub struct ChatCompletionGenerator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionGenerator {
    pub fn new(api_url: String, api_key: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build summary HTTP client")?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl SummaryGenerator for ChatCompletionGenerator {
    async fn generate(&self, book: &BookRecord) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": summary_prompt(book) },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("summary request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("summary request failed: {status}"));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("summary response is not a completion")?;

        Ok(extract_content(completion))
    }
}

fn extract_content(completion: CompletionResponse) -> String {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| EMPTY_COMPLETION.to_string())
}

/// Canned blurb used when generation is unavailable.
pub struct TemplateSummary;

impl TemplateSummary {
    pub fn render(book: &BookRecord) -> String {
        format!(
            "\"{}\" by {} is a captivating literary work that explores themes of human nature and society. This book offers readers a unique perspective on life and relationships, making it a must-read for anyone interested in thought-provoking literature.",
            book.title,
            authors_or_unknown(book),
        )
    }
}

#[derive(Clone, Default)]
pub struct SummaryService {
    primary: Option<Arc<dyn SummaryGenerator>>,
}

impl SummaryService {
    pub fn new(primary: Option<Arc<dyn SummaryGenerator>>) -> Self {
        Self { primary }
    }

    /// Never fails: falls back to [`TemplateSummary`].
    pub async fn summarize(&self, book: &BookRecord) -> String {
        let Some(primary) = &self.primary else {
            return TemplateSummary::render(book);
        };

        match primary.generate(book).await {
            Ok(summary) => summary,
            Err(err) => {
                log_warn!("summary generation for '{}' failed: {err:#}", book.title);
                TemplateSummary::render(book)
            }
        }
    }
}
