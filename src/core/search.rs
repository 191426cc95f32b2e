use crate::core::notify::{Notice, Notifier};
use crate::core::render::{render, RenderContext, ResultTable};
use crate::models::ShoeRecord;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the search endpoint
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Search endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Classified response of one search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// `null` or `[]`
    Empty,
    Results(Vec<ShoeRecord>),
    Failure(String),
}

impl SearchOutcome {
    /// Classify a response body
    pub fn from_body(body: &[u8]) -> Result<Self, SearchError> {
        let records: Option<Vec<ShoeRecord>> = serde_json::from_slice(body)?;
        Ok(match records {
            Some(records) if !records.is_empty() => SearchOutcome::Results(records),
            _ => SearchOutcome::Empty,
        })
    }
}

impl From<Result<SearchOutcome, SearchError>> for SearchOutcome {
    fn from(value: Result<SearchOutcome, SearchError>) -> Self {
        value.unwrap_or_else(|e| SearchOutcome::Failure(e.to_string()))
    }
}

/// What `search` did with a response
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// False when the stale guard discarded the response
    pub applied: bool,
}

/// Issues searches against the `/filter` endpoint and paints the outcome
///
/// Without the stale guard, overlapping searches resolve last-write-wins:
/// whichever response arrives last owns the table.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: String,
    success_dismiss: Duration,
    guard_stale: bool,
    generation: Arc<AtomicU64>,
}

impl SearchClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SearchError> {
        Ok(Self::with_client(Client::builder().build()?, endpoint))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            success_dismiss: Duration::from_millis(1500),
            guard_stale: false,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Build from the `[client]` configuration section
    pub fn from_settings(settings: &crate::config::ClientSettings) -> Result<Self, SearchError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self::with_client(builder.build()?, settings.endpoint.clone())
            .success_dismiss(Duration::from_millis(settings.success_dismiss_ms))
            .guard_stale(settings.guard_stale_responses))
    }

    pub fn success_dismiss(mut self, delay: Duration) -> Self {
        self.success_dismiss = delay;
        self
    }

    /// Discard responses that a newer search has superseded
    pub fn guard_stale(mut self, enabled: bool) -> Self {
        self.guard_stale = enabled;
        self
    }

    /// GET `{endpoint}?{query}` and classify the response
    pub async fn fetch(&self, query: &str) -> SearchOutcome {
        self.try_fetch(query).await.into()
    }

    async fn try_fetch(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let url = format!("{}?{}", self.endpoint, query);
        tracing::debug!("Searching: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Search endpoint returned {}: {}", status, body);
            return Err(SearchError::Status(status));
        }

        let body = response.bytes().await?;
        SearchOutcome::from_body(&body)
    }

    /// Run one search and reflect it in `table` and `notifier`
    pub async fn search<T: ResultTable + ?Sized>(
        &self,
        query: &str,
        ctx: &RenderContext,
        table: &mut T,
        notifier: &dyn Notifier,
    ) -> SearchReport {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        notifier.show_loading();
        let outcome = self.fetch(query).await;
        notifier.close_loading();

        if self.guard_stale && self.generation.load(Ordering::SeqCst) != ticket {
            tracing::info!("Discarding superseded search response (ticket {})", ticket);
            return SearchReport { outcome, applied: false };
        }

        match &outcome {
            SearchOutcome::Failure(reason) => {
                tracing::error!("Search failed: {}", reason);
                notifier.notify(Notice::error("Search failed", reason.clone()));
            }
            SearchOutcome::Empty => {
                table.set_retailer_name(ctx.retailer.display_name());
                table.clear();
                notifier.notify(Notice::info("Search results", "No matching results found"));
            }
            SearchOutcome::Results(records) => {
                render(records, ctx, table);
                tracing::info!("Rendered {} results from {}", records.len(), ctx.retailer);
                notifier.notify(Notice::success("Search succeeded", self.success_dismiss));
            }
        }

        SearchReport { outcome, applied: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_empty_are_equivalent() {
        assert_eq!(SearchOutcome::from_body(b"null").unwrap(), SearchOutcome::Empty);
        assert_eq!(SearchOutcome::from_body(b"[]").unwrap(), SearchOutcome::Empty);
    }

    #[test]
    fn test_other_shapes_rejected() {
        assert!(SearchOutcome::from_body(b"{\"name\":\"A\"}").is_err());
        assert!(SearchOutcome::from_body(b"<html>").is_err());
        assert!(SearchOutcome::from_body(b"[{\"name\":\"A\"}]").is_err());
    }

    #[test]
    fn test_results_keep_order() {
        let body = br#"[
            {"name":"B","price":"1","image":"b.png","url":"b"},
            {"name":"A","price":2,"image":"a.png","url":"a"}
        ]"#;
        match SearchOutcome::from_body(body).unwrap() {
            SearchOutcome::Results(records) => {
                assert_eq!(records[0].name, "B");
                assert_eq!(records[1].name, "A");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
