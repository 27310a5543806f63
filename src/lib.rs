// src/lib.rs
// =============================================================================
// link-spider explores the pages reachable from a seed URL, up to a bounded
// number of link hops, fetching each distinct URL at most once.
//
// Modules:
// - config: CrawlOptions, the knobs of one traversal
// - crawl: the traversal engine (strategies, registry, frontier, workers)
// - fetch: the PageFetcher boundary and its reqwest implementation
// - error: typed errors for all of the above
//
// The binary in src/main.rs is a thin command-line wrapper around `crawl`.
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;

pub use config::CrawlOptions;
pub use crawl::{crawl, crawl_named, CrawlReport, CrawlStats, Job, Strategy, VisitedRegistry};
pub use error::{CrawlError, FetchError};
pub use fetch::{HttpFetcher, PageFetcher, PageResult};
