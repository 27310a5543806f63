// src/crawl/testing.rs
// =============================================================================
// In-memory PageFetcher for engine tests: a static link graph, optional
// failures and delays, and a record of which URLs were fetched. Also a
// subscriber that writes formatted trace lines into a buffer.
// =============================================================================

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Level;

use crate::error::FetchError;
use crate::fetch::{PageFetcher, PageResult};

#[derive(Debug, Default)]
pub struct StubFetcher {
    links: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    slow: HashMap<String, Duration>,
    delay: Option<Duration>,
    counts: Arc<DashMap<String, usize>>,
    order: Arc<Mutex<Vec<String>>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, links: &[&str]) -> Self {
        self.links
            .insert(url.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn slow(mut self, url: &str, delay: Duration) -> Self {
        self.slow.insert(url.to_string(), delay);
        self
    }

    // Applied to every fetch, to widen race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn counts(&self) -> Arc<DashMap<String, usize>> {
        self.counts.clone()
    }

    pub fn order(&self) -> Arc<Mutex<Vec<String>>> {
        self.order.clone()
    }

    pub fn title_of(url: &str) -> String {
        format!("Title of {url}")
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<PageResult, FetchError> {
        *self.counts.entry(url.to_string()).or_insert(0) += 1;
        self.order.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.slow.get(url).copied().or(self.delay) {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(url) {
            return Err(FetchError::Connect(format!("stub refuses {url}")));
        }

        let links = self.links.get(url).ok_or(FetchError::Status(404))?;
        Ok(PageResult {
            url: url.to_string(),
            title: Self::title_of(url),
            body: links.join(" "),
            found_links: links.clone(),
        })
    }
}

// Shared sink for formatted trace output
#[derive(Debug, Clone, Default)]
pub struct TraceBuffer(Arc<Mutex<Vec<u8>>>);

impl TraceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    // Plain-text subscriber at debug level writing into this buffer
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let buffer = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || buffer.clone())
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .finish()
    }
}

impl io::Write for TraceBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// Runs `f` with a capturing subscriber and returns everything it traced
pub fn capture_traces(f: impl FnOnce()) -> String {
    let buffer = TraceBuffer::new();
    tracing::subscriber::with_default(buffer.subscriber(), f);
    buffer.contents()
}
