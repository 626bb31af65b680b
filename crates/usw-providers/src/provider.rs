//! CalendarProvider trait and the iCalendar source provider.
//!
//! A provider turns its configured sources into one merged list of
//! [`RawEvent`]s. Fetching is async; everything after it (expansion,
//! normalization, resolution) is synchronous.

use std::future::Future;
use std::io::ErrorKind;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::ics::parse_ics_content;
use crate::raw_event::RawEvent;
use crate::source::{CalendarSource, SourceKind};

/// Default HTTP timeout for web sources.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A boxed future for async trait methods.
///
/// Using boxed futures keeps the trait object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core abstraction for calendar backends.
pub trait CalendarProvider: Send + Sync {
    /// Returns the name/type of this provider (e.g., "ics").
    fn name(&self) -> &str;

    /// Fetches the raw events of every source.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if any source cannot be fetched or parsed.
    fn fetch_events(&self) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>>;
}

/// Settings for [`IcsProvider`].
#[derive(Debug, Clone)]
pub struct IcsProviderConfig {
    /// Timeout for each HTTP request.
    pub timeout: Duration,
    /// User-Agent header sent to web sources.
    pub user_agent: String,
}

impl Default for IcsProviderConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("usw/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl IcsProviderConfig {
    /// Builder method to set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reads iCalendar files from URLs and local paths.
pub struct IcsProvider {
    client: Client,
    sources: Vec<CalendarSource>,
}

impl IcsProvider {
    /// Creates a provider for the given sources.
    pub fn new(sources: Vec<CalendarSource>, config: IcsProviderConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::network(format!("Failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self { client, sources })
    }

    /// Fetches and parses a single source.
    async fn fetch_source(&self, source: &CalendarSource) -> ProviderResult<Vec<RawEvent>> {
        let content = match source.kind {
            SourceKind::Web => self.fetch_web(&source.path).await,
            SourceKind::Local => read_local(&source.path).await,
        }
        .map_err(|e| e.with_source_path(&source.path))?;

        parse_ics_content(&content, &source.path)
    }

    async fn fetch_web(&self, url: &str) -> ProviderResult<String> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await.map_err(|e| {
            ProviderError::network(format!("request failed: {}", e)).with_source(e)
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found("calendar not found (404)"));
        }
        if status.is_server_error() {
            return Err(ProviderError::server(format!("server returned {}", status)));
        }
        if !status.is_success() {
            return Err(ProviderError::invalid_response(format!(
                "unexpected status {}",
                status
            )));
        }

        response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response body: {}", e)).with_source(e)
        })
    }
}

async fn read_local(path: &str) -> ProviderResult<String> {
    debug!(path = %path, "Reading calendar file");
    tokio::fs::read_to_string(path).await.map_err(|e| {
        let error = if e.kind() == ErrorKind::NotFound {
            ProviderError::not_found("calendar file does not exist")
        } else {
            ProviderError::io(format!("failed to read calendar file: {}", e))
        };
        error.with_source(e)
    })
}

impl CalendarProvider for IcsProvider {
    fn name(&self) -> &str {
        "ics"
    }

    fn fetch_events(&self) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            let mut events = Vec::new();
            for source in &self.sources {
                let fetched = self.fetch_source(source).await?;
                info!(source = %source, count = fetched.len(), "Fetched calendar source");
                events.extend(fetched);
            }
            Ok(events)
        })
    }
}
