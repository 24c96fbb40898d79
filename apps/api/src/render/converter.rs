//! HTML → PDF conversion through an external document service.
//!
//! The only suspension point in rendering. `HttpDocumentConverter` talks to the
//! service and retries transient failures; `BoundedConverter` wraps any
//! converter with a concurrency limit and an overall timeout. Dropping the
//! returned future cancels the conversion.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::render::styles::PageGeometry;

const DEFAULT_RETRY_BASE: Duration = Duration::from_millis(500);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);
const MAX_BACKOFF_SHIFT: u32 = 16;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("document service is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("document service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("document service returned an empty document")]
    Empty,

    #[error("conversion timed out after {0:?}")]
    Timeout(Duration),

    #[error("converter is shutting down")]
    Closed,
}

/// Paper settings forwarded to the document service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub paper: String,
    pub margin_pt: f32,
}

impl From<&PageGeometry> for PageSpec {
    fn from(page: &PageGeometry) -> Self {
        Self {
            paper: page.paper.clone(),
            margin_pt: page.margin,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionRequest {
    pub html: String,
    pub filename: String,
    pub page: PageSpec,
}

/// Turns print-ready HTML into document bytes.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, request: &ConversionRequest) -> Result<Bytes, ConvertError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP document service
// ────────────────────────────────────────────────────────────────────────────

/// Posts `{ html, filename, page }` JSON and expects the document bytes back.
/// Retries transport errors and 5xx responses with exponential backoff.
#[derive(Clone)]
pub struct HttpDocumentConverter {
    client: Client,
    url: String,
    max_retries: u32,
    retry_base: Duration,
}

impl HttpDocumentConverter {
    pub fn new(url: String, max_retries: u32) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            url,
            max_retries,
            retry_base: DEFAULT_RETRY_BASE,
        })
    }

    pub fn with_retry_base(mut self, retry_base: Duration) -> Self {
        self.retry_base = retry_base;
        self
    }
}

/// Exponential backoff: base, 2×base, 4×base, ... capped at `MAX_RETRY_DELAY`.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32 << attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT);
    base.checked_mul(factor)
        .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
}

#[async_trait]
impl DocumentConverter for HttpDocumentConverter {
    async fn convert(&self, request: &ConversionRequest) -> Result<Bytes, ConvertError> {
        let mut last_error: Option<ConvertError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.retry_base, attempt);
                warn!(
                    "Conversion attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&self.url).json(request).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ConvertError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Document service returned {}: {}", status, body);
                last_error = Some(ConvertError::Service {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ConvertError::Service {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Err(ConvertError::Empty);
            }
            debug!(
                "Converted {} ({} bytes)",
                request.filename,
                bytes.len()
            );
            return Ok(bytes);
        }

        Err(last_error.unwrap_or(ConvertError::NotConfigured))
    }
}

/// Stand-in used when no document service URL is configured.
pub struct UnconfiguredConverter;

#[async_trait]
impl DocumentConverter for UnconfiguredConverter {
    async fn convert(&self, _request: &ConversionRequest) -> Result<Bytes, ConvertError> {
        Err(ConvertError::NotConfigured)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Concurrency + timeout
// ────────────────────────────────────────────────────────────────────────────

/// Limits in-flight conversions and bounds each one, queueing included, by `timeout`.
pub struct BoundedConverter {
    inner: Arc<dyn DocumentConverter>,
    permits: Semaphore,
    timeout: Duration,
}

impl BoundedConverter {
    pub fn new(inner: Arc<dyn DocumentConverter>, max_in_flight: usize, timeout: Duration) -> Self {
        Self {
            inner,
            permits: Semaphore::new(max_in_flight.max(1)),
            timeout,
        }
    }
}

#[async_trait]
impl DocumentConverter for BoundedConverter {
    async fn convert(&self, request: &ConversionRequest) -> Result<Bytes, ConvertError> {
        let bounded = async {
            let _permit = self.permits.acquire().await.map_err(|_| ConvertError::Closed)?;
            self.inner.convert(request).await
        };

        match tokio::time::timeout(self.timeout, bounded).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Conversion of {} timed out after {:?}", request.filename, self.timeout);
                Err(ConvertError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{http::StatusCode, routing::post, Router};

    fn request() -> ConversionRequest {
        ConversionRequest {
            html: "<p>hi</p>".to_string(),
            filename: "resume.pdf".to_string(),
            page: PageSpec::from(&PageGeometry::a4()),
        }
    }

    #[test]
    fn test_backoff_doubles_and_is_capped() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 2), Duration::from_secs(1));
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(2));
        assert_eq!(backoff_delay(base, 7), MAX_RETRY_DELAY);
        assert_eq!(backoff_delay(base, 40), MAX_RETRY_DELAY);
        assert_eq!(backoff_delay(base, u32::MAX), MAX_RETRY_DELAY);
        assert_eq!(backoff_delay(Duration::MAX, 3), MAX_RETRY_DELAY);
    }

    /// Sleeps, then returns fixed bytes; records peak concurrency.
    struct SlowConverter {
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowConverter {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DocumentConverter for SlowConverter {
        async fn convert(&self, _request: &ConversionRequest) -> Result<Bytes, ConvertError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Bytes::from_static(b"%PDF-1.7"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_conversion_times_out() {
        let slow = Arc::new(SlowConverter::new(Duration::from_secs(60)));
        let bounded = BoundedConverter::new(slow, 1, Duration::from_secs(5));

        let err = bounded.convert(&request()).await.unwrap_err();
        assert!(matches!(err, ConvertError::Timeout(d) if d == Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_permit_serializes_conversions() {
        let slow = Arc::new(SlowConverter::new(Duration::from_secs(1)));
        let bounded = BoundedConverter::new(slow.clone(), 1, Duration::from_secs(30));

        let req = request();
        let (a, b, c) = tokio::join!(
            bounded.convert(&req),
            bounded.convert(&req),
            bounded.convert(&req)
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(slow.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queue_wait_counts_toward_timeout() {
        let slow = Arc::new(SlowConverter::new(Duration::from_secs(4)));
        let bounded = BoundedConverter::new(slow, 1, Duration::from_secs(6));

        let req = request();
        let (first, second) = tokio::join!(bounded.convert(&req), bounded.convert(&req));
        assert!(first.is_ok());
        assert!(matches!(second, Err(ConvertError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_unconfigured_converter_fails() {
        let err = UnconfiguredConverter.convert(&request()).await.unwrap_err();
        assert!(matches!(err, ConvertError::NotConfigured));
    }

    /// Serves `router` on an ephemeral local port and returns its URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/convert")
    }

    #[tokio::test]
    async fn test_http_converter_retries_server_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/convert",
            post(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        (StatusCode::SERVICE_UNAVAILABLE, Vec::new())
                    } else {
                        (StatusCode::OK, b"%PDF-1.7".to_vec())
                    }
                }
            }),
        );
        let url = serve(router).await;

        let converter = HttpDocumentConverter::new(url, 2)
            .unwrap()
            .with_retry_base(Duration::from_millis(5));
        let bytes = converter.convert(&request()).await.unwrap();

        assert_eq!(&bytes[..], b"%PDF-1.7");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_http_converter_does_not_retry_client_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/convert",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::BAD_REQUEST, "bad html")
                }
            }),
        );
        let url = serve(router).await;

        let converter = HttpDocumentConverter::new(url, 3)
            .unwrap()
            .with_retry_base(Duration::from_millis(5));
        let err = converter.convert(&request()).await.unwrap_err();

        assert!(matches!(err, ConvertError::Service { status: 400, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
