// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command: crawl from a seed URL. Every flag maps onto one
// field of CrawlOptions. The strategy is taken as plain text on purpose, so
// that an unknown name reaches the engine and is reported there as "nothing
// selected" instead of clap rejecting the whole command line.
// =============================================================================

use clap::Parser;
use std::time::Duration;

use link_spider::config::{
    CrawlOptions, DEFAULT_FRONTIER_CAPACITY, DEFAULT_MAX_BODY_BYTES, DEFAULT_WORKERS,
};

#[derive(Parser, Debug)]
#[command(
    name = "link-spider",
    version,
    about = "Explore the pages reachable from a seed URL, up to a bounded depth",
    long_about = "link-spider fetches a seed page, pulls every absolute http(s) link out of it, \
                  and keeps following links until the depth bound is reached. Each URL is \
                  fetched at most once."
)]
pub struct Cli {
    /// Seed URL to start from (e.g., https://example.com)
    pub url: String,

    /// Traversal strategy: dfs, bfs or bfs-concurrent
    #[arg(long, short, default_value = "bfs-concurrent")]
    pub strategy: String,

    /// Number of link levels to fetch
    ///
    /// Depth 1 = just the seed page
    /// Depth 2 = seed page + all pages it links to
    #[arg(long, default_value_t = 3)]
    pub max_depth: usize,

    /// Worker pool size (bfs-concurrent only)
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Frontier capacity; links found while it is full are dropped
    /// (bfs-concurrent only)
    #[arg(long, default_value_t = DEFAULT_FRONTIER_CAPACITY)]
    pub capacity: usize,

    /// Deadline for each page fetch, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Bytes of each page inspected for a title and links (0 = whole page)
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Print one line per crawl state transition
    #[arg(long)]
    pub debug: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn crawl_options(&self) -> CrawlOptions {
        let max_body_bytes = match self.max_body_bytes {
            0 => None,
            limit => Some(limit),
        };

        CrawlOptions::new(self.max_depth)
            .with_debug(self.debug)
            .with_workers(self.workers)
            .with_frontier_capacity(self.capacity)
            .with_fetch_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_body_bytes(max_body_bytes)
    }
}
