//! Hosted document parsing through the LlamaParse REST API
//!
//! Flow: upload the file, poll the job until it reaches a terminal state,
//! then download the markdown result. Pages in the markdown are separated by
//! a horizontal rule and become individual segments.

use super::{DocumentParser, ParsedSegment};
use crate::config::DocumentParserConfig;
use crate::error::{LicaError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const PAGE_SEPARATOR: &str = "\n---\n";

/// Client for the LlamaParse parsing service
pub struct LlamaParseClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: u32,
}

#[derive(Debug, Deserialize)]
struct JobResponse {
    id: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarkdownResult {
    markdown: String,
}

impl LlamaParseClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(LicaError::Http)?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            poll_interval: Duration::from_millis(2000),
            max_polls: 150,
        })
    }

    pub fn from_config(config: &DocumentParserConfig) -> Result<Self> {
        let api_key = config.llama_parse_api_key.clone().ok_or_else(|| {
            LicaError::Config(
                "llama_parse backend requires LLAMA_CLOUD_API_KEY or document_parser.llama_parse_api_key"
                    .to_string(),
            )
        })?;

        Ok(Self::new(config.llama_parse_url.clone(), api_key)?
            .with_polling(Duration::from_millis(config.poll_interval_ms), config.max_polls))
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn send_json<T: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LicaError::ExternalError(format!(
                "LlamaParse {} failed (HTTP {}): {}",
                what, status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn upload(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.pdf".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let request = self
            .http_client
            .post(format!("{}/upload", self.base_url))
            .multipart(form);
        let job: JobResponse = self.send_json(request, "upload").await?;

        tracing::debug!("LlamaParse job {} created for {:?}", job.id, path);
        Ok(job.id)
    }

    async fn wait_for_job(&self, job_id: &str) -> Result<()> {
        for attempt in 1..=self.max_polls {
            let request = self
                .http_client
                .get(format!("{}/job/{}", self.base_url, job_id));
            let job: JobResponse = self.send_json(request, "status").await?;
            let status = job.status.unwrap_or_default().to_ascii_uppercase();

            match status.as_str() {
                "SUCCESS" => return Ok(()),
                "ERROR" | "CANCELED" | "CANCELLED" => {
                    return Err(LicaError::ExternalError(format!(
                        "LlamaParse job {} ended with status {}",
                        job_id, status
                    )));
                }
                _ => {
                    tracing::debug!(
                        "LlamaParse job {} status {} (check {}/{})",
                        job_id,
                        status,
                        attempt,
                        self.max_polls
                    );
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        Err(LicaError::ExternalError(format!(
            "LlamaParse job {} did not finish after {} checks",
            job_id, self.max_polls
        )))
    }

    async fn markdown(&self, job_id: &str) -> Result<String> {
        let request = self
            .http_client
            .get(format!("{}/job/{}/result/markdown", self.base_url, job_id));
        let result: MarkdownResult = self.send_json(request, "result").await?;
        Ok(result.markdown)
    }
}

/// Split LlamaParse markdown into page segments
fn split_markdown_pages(markdown: &str) -> Vec<ParsedSegment> {
    markdown
        .split(PAGE_SEPARATOR)
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .map(ParsedSegment::new)
        .collect()
}

#[async_trait]
impl DocumentParser for LlamaParseClient {
    async fn parse(&self, path: &Path) -> Result<Vec<ParsedSegment>> {
        let job_id = self.upload(path).await?;
        self.wait_for_job(&job_id).await?;
        let markdown = self.markdown(&job_id).await?;
        Ok(split_markdown_pages(&markdown))
    }

    fn parser_name(&self) -> &str {
        "llama-parse"
    }
}
