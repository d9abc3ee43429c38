use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::telemetry::{self};
use crate::telemetry::ops::extract::Phase as ExtractPhase;

use super::extractor::Registry;
use super::fetch::{self, FetchSettings, MAX_CONCURRENCY};
use super::task;
use super::types::{BatchResult, ExtractionResult};

/// Runs one fetch-and-extract task per URL with at most `concurrency` in flight.
/// All tasks share the same client and registry.
#[derive(Clone)]
pub struct Batch {
    client: Client,
    registry: Arc<Registry>,
    permits: Arc<Semaphore>,
    settings: FetchSettings,
}

impl Batch {
    pub fn new(registry: Registry, settings: FetchSettings) -> Result<Self> {
        let client = fetch::build_client(settings.timeout())?;
        Ok(Self {
            client,
            registry: Arc::new(registry),
            permits: Arc::new(Semaphore::new(settings.concurrency.clamp(1, MAX_CONCURRENCY))),
            settings,
        })
    }

    /// Results come back in the order of `urls`, whatever order the fetches finish in.
    pub async fn run(&self, urls: Vec<String>) -> BatchResult {
        let log = telemetry::extract();
        let timeout_secs = self.settings.timeout_secs;

        let handles: Vec<_> = urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| {
                let client = self.client.clone();
                let registry = self.registry.clone();
                let permits = self.permits.clone();
                let span = log.url_span(i, &url);
                let task_url = url.clone();
                let handle = tokio::spawn(
                    async move {
                        let _permit = match permits.acquire_owned().await {
                            Ok(p) => p,
                            Err(e) => return ExtractionResult::failure(task_url, format!("task aborted: {e}")),
                        };
                        task::process(&client, &registry, &task_url, timeout_secs).await
                    }
                    .instrument(span),
                );
                (url, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (i, (url, handle)) in handles.into_iter().enumerate() {
            let result = match handle.instrument(log.span(&ExtractPhase::Collect)).await {
                Ok(r) => r,
                Err(e) => ExtractionResult::failure(url, format!("task aborted: {e}")),
            };
            log.url_outcome(i, &result);
            results.push(result);
        }

        let batch = BatchResult { results };
        log.totals(&batch.totals());
        batch
    }
}
