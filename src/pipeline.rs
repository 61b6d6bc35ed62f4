//! One fetch cycle: HTTP GET, table extraction, dataset construction.
//!
//! Each invocation is independent and stateless; a cycle either ends with a
//! dataset or fails with a typed reason. There is no retry inside the
//! pipeline; re-running the whole cycle is the caller's call.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::USER_AGENT;
use tracing::info;

use crate::config::Config;
use crate::dataset::{self, QuoteDataset};
use crate::error::{PipelineError, Result};
use crate::extract;

pub struct FetchPipeline {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl FetchPipeline {
    /// Builds the HTTP client with the configured timeout so a slow upstream
    /// cannot hang a serving request.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Runs a full cycle against the configured upstream page.
    pub async fn run(&self) -> Result<QuoteDataset> {
        info!(url = %self.config.upstream_url, "fetching quotes page");
        let response = self
            .client
            .get(&self.config.upstream_url)
            .header(USER_AGENT, self.config.user_agent.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        self.process_html(&body)
    }

    /// Extraction and normalization for an already-fetched page body. Split
    /// out so the parsing stages can be exercised without a network.
    pub fn process_html(&self, html: &str) -> Result<QuoteDataset> {
        let (header, rows) = extract::extract(html, &self.config.extract_options())?;
        info!(columns = header.len(), rows = rows.len(), "table extracted");

        let dataset = dataset::build(header, rows, &self.config.column_spec())?;
        info!(
            rows = dataset.len(),
            skipped = dataset.skipped_rows(),
            "dataset built"
        );
        Ok(dataset)
    }
}
