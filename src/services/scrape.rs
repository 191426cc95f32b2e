use crate::config::ScrapeSettings;
use reqwest::{Certificate, Client};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Errors that can occur while scraping a retailer
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Retailer returned error: {0}")]
    ApiError(String),

    #[error("Invalid category id: {0}")]
    InvalidCategory(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Item is not footwear: {0}")]
    NotFootwear(String),

    #[error("Failed to read CA certificate {path}: {source}")]
    CaCertificate {
        path: String,
        source: std::io::Error,
    },
}

impl ScrapeError {
    /// Whether the caller's input caused the error
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ScrapeError::InvalidCategory(_))
    }
}

/// Build the outbound HTTP client shared by every retailer scraper
pub fn build_http_client(settings: &ScrapeSettings) -> Result<Client, ScrapeError> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .user_agent(concat!("shoe-scout/", env!("CARGO_PKG_VERSION")));

    if let Some(path) = &settings.ca_cert_path {
        let pem = std::fs::read(path).map_err(|source| ScrapeError::CaCertificate {
            path: path.clone(),
            source,
        })?;
        builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
        tracing::info!("Loaded extra CA certificate from {}", path);
    }

    Ok(builder.build()?)
}

/// Run `task` for every item with at most `limit` in flight
///
/// Results come back in input order, tagged with the input index. Tasks
/// that panic are logged and left out.
pub async fn fan_out<T, F, Fut>(items: Vec<T>, limit: usize, task: F) -> Vec<(usize, Fut::Output)>
where
    F: Fn(T) -> Fut,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut set = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        let fut = task(item);
        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            (index, fut.await)
        });
    }

    let mut results = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => tracing::error!("Scrape task failed: {}", e),
        }
    }

    results.sort_by_key(|(index, _)| *index);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fan_out_preserves_order_and_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = fan_out((0..20).collect(), 3, |n: u64| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20 - n)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                n * 2
            }
        })
        .await;

        let values: Vec<u64> = results.into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, (0..20).map(|n| n * 2).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn test_invalid_category_is_bad_request() {
        assert!(ScrapeError::InvalidCategory("abc".into()).is_bad_request());
        assert!(!ScrapeError::ApiError("503".into()).is_bad_request());
    }
}
