// src/fetch/mod.rs
// =============================================================================
// This module is the boundary between the crawl engine and the network.
//
// Submodules:
// - extract: pulls the title and the absolute links out of a page body
// - http: the reqwest-backed PageFetcher used by the CLI
//
// The engine only ever sees the PageFetcher trait, which is what lets the
// tests drive every traversal strategy with an in-memory link graph.
// =============================================================================

mod extract;
mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

pub use extract::{build_page, find_links, find_title, UNKNOWN_TITLE};
pub use http::HttpFetcher;

// Everything the crawler keeps about one successfully fetched page.
// Created once per URL by a fetcher and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub title: String,
    /// The inspected part of the body; left out of JSON output
    #[serde(skip_serializing, default)]
    pub body: String,
    /// Links in the order they appear in the body
    pub found_links: Vec<String>,
}

// Performs exactly one fetch attempt for a URL.
//
// Implementations must not retry and must not cache across calls; the
// engine applies its own deadline on top of whatever the fetcher does.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageResult, FetchError>;
}
