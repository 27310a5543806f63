// src/fetch/http.rs
// =============================================================================
// The PageFetcher used against real websites.
//
// One GET per call, no retries. Redirects are followed the way reqwest does
// by default and nothing else. The body is read chunk by chunk and cut off at
// `max_body_bytes`, so a huge page costs at most that much memory.
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

use super::{extract, PageFetcher, PageResult};
use crate::config::CrawlOptions;
use crate::error::FetchError;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    max_body_bytes: Option<usize>,
}

impl HttpFetcher {
    pub fn new(options: &CrawlOptions) -> Result<Self, FetchError> {
        // Client is reused for every fetch (connection pooling)
        let client = Client::builder()
            .timeout(options.fetch_timeout)
            .user_agent(concat!("link-spider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self {
            client,
            timeout: options.fetch_timeout,
            max_body_bytes: options.max_body_bytes,
        })
    }

    // Reads at most `max_body_bytes` of the body and stops there without
    // draining the rest of the response.
    async fn read_body(&self, mut response: Response) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_body(e, self.timeout))?
        {
            match self.max_body_bytes {
                Some(limit) => {
                    let room = limit.saturating_sub(body.len());
                    body.extend_from_slice(&chunk[..chunk.len().min(room)]);
                    if body.len() >= limit {
                        break;
                    }
                }
                None => body.extend_from_slice(&chunk),
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PageResult, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = self.read_body(response).await?;
        debug!(url, bytes = body.len(), "fetched page");

        Ok(extract::build_page(url, &body))
    }
}
