// src/crawl/mod.rs
// =============================================================================
// This module is the traversal engine.
//
// Features:
// - Three strategies over the same per-job logic: depth-first, breadth-first
//   and concurrent breadth-first with a bounded frontier and worker pool
// - A fresh visited registry per crawl, claimed atomically per URL
// - Depth bound: the seed is depth 0 and only jobs below max_depth are fetched
// - Outcome counters returned with the pages, plus an optional debug trace
//
// Submodules:
// - registry: URL -> PageResult, the crawl's output
// - frontier: stack, queue and bounded-channel job containers
// - termination: outstanding-job counting for the concurrent crawl
// - progress: counters and trace lines
// - visit: what happens to a single job
// - sequential / concurrent: the drivers
// =============================================================================

mod concurrent;
mod frontier;
mod progress;
mod registry;
mod sequential;
mod termination;
mod visit;

#[cfg(test)]
pub(crate) mod testing;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::CrawlOptions;
use crate::error::{Result, UnknownStrategy};
use crate::fetch::{PageFetcher, PageResult};

pub use frontier::{BoundedFrontier, Frontier, Push, QueueFrontier, StackFrontier};
pub use progress::{CrawlStats, Progress};
pub use registry::{Claim, VisitedRegistry};
pub use termination::{Delta, Status, TerminationDetector};
pub use visit::JobProcessor;

// One unit of pending work. `depth` counts link hops from the seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub url: String,
    pub depth: usize,
}

impl Job {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }

    pub fn seed(url: impl Into<String>) -> Self {
        Self::new(url, 0)
    }

    pub fn child(&self, url: &str) -> Self {
        Self::new(url, self.depth + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    DepthFirst,
    BreadthFirst,
    BreadthFirstConcurrent,
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfs" | "depth-first" => Ok(Strategy::DepthFirst),
            "bfs" | "breadth-first" => Ok(Strategy::BreadthFirst),
            "bfs concurrent" | "bfs-concurrent" | "concurrent" | "breadth-first-concurrent" => {
                Ok(Strategy::BreadthFirstConcurrent)
            }
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::DepthFirst => "dfs",
            Strategy::BreadthFirst => "bfs",
            Strategy::BreadthFirstConcurrent => "bfs-concurrent",
        };
        f.write_str(name)
    }
}

// Everything a finished crawl hands back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub strategy: Strategy,
    pub seed: String,
    pub max_depth: usize,
    pub pages: BTreeMap<String, PageResult>,
    pub stats: CrawlStats,
}

// Crawls from `seed` with the given strategy and returns every page fetched.
//
// A failing page never aborts the crawl; it shows up in `stats.failed`.
// Errors are only returned for invalid options or an engine fault.
pub async fn crawl(
    strategy: Strategy,
    seed: &str,
    options: &CrawlOptions,
    fetcher: Arc<dyn PageFetcher>,
) -> Result<CrawlReport> {
    options.validate(strategy)?;
    info!(%strategy, seed, max_depth = options.max_depth, "starting crawl");

    let processor = JobProcessor::new(fetcher, options);
    match strategy {
        Strategy::DepthFirst => {
            sequential::run(StackFrontier::default(), seed, &processor).await;
        }
        Strategy::BreadthFirst => {
            sequential::run(QueueFrontier::default(), seed, &processor).await;
        }
        Strategy::BreadthFirstConcurrent => {
            concurrent::run(seed, &processor, options).await?;
        }
    }

    let report = CrawlReport {
        strategy,
        seed: seed.to_string(),
        max_depth: options.max_depth,
        pages: processor.registry().pages(),
        stats: processor.progress().snapshot(),
    };
    info!(
        pages = report.pages.len(),
        failed = report.stats.failed,
        dropped = report.stats.dropped,
        "crawl finished"
    );

    Ok(report)
}

// Same as `crawl`, but takes the strategy by name. An unrecognised name is
// reported and treated as "nothing to do" rather than as an error.
pub async fn crawl_named(
    strategy: &str,
    seed: &str,
    options: &CrawlOptions,
    fetcher: Arc<dyn PageFetcher>,
) -> Result<Option<CrawlReport>> {
    match strategy.parse::<Strategy>() {
        Ok(strategy) => crawl(strategy, seed, options, fetcher).await.map(Some),
        Err(e) => {
            warn!("{e}, no crawl performed");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::testing::StubFetcher;
    use crate::error::CrawlError;
    use std::collections::BTreeSet;

    const ALL: [Strategy; 3] = [
        Strategy::DepthFirst,
        Strategy::BreadthFirst,
        Strategy::BreadthFirstConcurrent,
    ];

    fn keys(report: &CrawlReport) -> BTreeSet<String> {
        report.pages.keys().cloned().collect()
    }

    fn set(urls: &[&str]) -> BTreeSet<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    // a -> [b, c], b -> [d], c -> [a], d -> []
    fn scenario() -> StubFetcher {
        StubFetcher::new()
            .page("https://a.test/", &["https://b.test/", "https://c.test/"])
            .page("https://b.test/", &["https://d.test/"])
            .page("https://c.test/", &["https://a.test/"])
            .page("https://d.test/", &[])
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_scenario_excludes_pages_past_the_bound() {
        for strategy in ALL {
            let fetcher = scenario();
            let counts = fetcher.counts();
            let report = crawl(strategy, "https://a.test/", &CrawlOptions::new(2), Arc::new(fetcher))
                .await
                .unwrap();

            assert_eq!(
                keys(&report),
                set(&["https://a.test/", "https://b.test/", "https://c.test/"]),
                "{strategy}"
            );
            // The c -> a cycle never re-fetches a; d is never fetched
            assert_eq!(counts.get("https://a.test/").map(|c| *c), Some(1), "{strategy}");
            assert!(counts.get("https://d.test/").is_none(), "{strategy}");
            assert_eq!(
                report.pages["https://b.test/"].title,
                StubFetcher::title_of("https://b.test/")
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_depth_bound_on_a_chain() {
        // n0 -> n1 -> ... -> n9, hop distance of n{i} is i
        let mut fetcher = StubFetcher::new();
        let names: Vec<String> = (0..10).map(|i| format!("https://n{i}.test/")).collect();
        for pair in names.windows(2) {
            fetcher = fetcher.page(&pair[0], &[pair[1].as_str()]);
        }
        let fetcher = Arc::new(fetcher.page(&names[9], &[]));

        for strategy in ALL {
            for max_depth in 0..12 {
                let report = crawl(
                    strategy,
                    &names[0],
                    &CrawlOptions::new(max_depth),
                    fetcher.clone(),
                )
                .await
                .unwrap();

                let expected: BTreeSet<String> = names.iter().take(max_depth).cloned().collect();
                assert_eq!(keys(&report), expected, "{strategy} depth {max_depth}");
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pages_linked_from_everywhere_are_kept_once() {
        let hub = "https://hub.test/";
        let fetcher = StubFetcher::new()
            .page("https://a.test/", &["https://b.test/", "https://c.test/", hub, hub])
            .page("https://b.test/", &[hub, "https://c.test/"])
            .page("https://c.test/", &[hub, "https://b.test/"])
            .page(hub, &["https://a.test/"]);
        let counts = fetcher.counts();
        let fetcher = Arc::new(fetcher);

        for strategy in ALL {
            counts.clear();
            let report = crawl(strategy, "https://a.test/", &CrawlOptions::new(5), fetcher.clone())
                .await
                .unwrap();

            assert_eq!(report.pages.len(), 4, "{strategy}");
            assert!(report.stats.duplicates > 0, "{strategy}");
            for entry in counts.iter() {
                assert_eq!(*entry.value(), 1, "{strategy}: {}", entry.key());
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_strategies_agree_on_a_tree() {
        // Three levels of fanout 3, plus links leaving the tree's depth bound
        let mut fetcher = StubFetcher::new();
        let mut level = vec!["https://root.test/".to_string()];
        for depth in 0..4 {
            let mut next = Vec::new();
            for parent in &level {
                let children: Vec<String> =
                    (0..3).map(|i| format!("{parent}{depth}{i}/")).collect();
                let refs: Vec<&str> = children.iter().map(String::as_str).collect();
                fetcher = fetcher.page(parent, &refs);
                next.extend(children);
            }
            level = next;
        }
        let fetcher = Arc::new(fetcher);

        let mut results = Vec::new();
        for strategy in ALL {
            let report = crawl(strategy, "https://root.test/", &CrawlOptions::new(3), fetcher.clone())
                .await
                .unwrap();
            assert_eq!(report.stats.dropped, 0);
            results.push(keys(&report));
        }

        // 1 + 3 + 9 pages sit above the bound
        assert_eq!(results[0].len(), 13);
        assert_eq!(results[0], results[1]);
        assert_eq!(results[1], results[2]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_strategies_agree_on_a_dag() {
        // a -> [b, c], b -> [c], c -> [d]. Depth-first meets c through b at
        // hop 2 first, where its link to d is past the bound; the direct
        // a -> c edge puts c at hop 1 and d at hop 2.
        let fetcher = StubFetcher::new()
            .page("https://a.test/", &["https://b.test/", "https://c.test/"])
            .page("https://b.test/", &["https://c.test/"])
            .page("https://c.test/", &["https://d.test/"])
            .page("https://d.test/", &[]);
        let counts = fetcher.counts();
        let fetcher = Arc::new(fetcher);

        for strategy in ALL {
            counts.clear();
            let report = crawl(strategy, "https://a.test/", &CrawlOptions::new(3), fetcher.clone())
                .await
                .unwrap();

            assert_eq!(
                keys(&report),
                set(&["https://a.test/", "https://b.test/", "https://c.test/", "https://d.test/"]),
                "{strategy}"
            );
            assert_eq!(counts.get("https://c.test/").map(|c| *c), Some(1), "{strategy}");
        }
    }

    #[tokio::test]
    async fn test_depth_first_follows_a_shorter_path_without_refetching() {
        let fetcher = StubFetcher::new()
            .page("https://a.test/", &["https://b.test/", "https://c.test/"])
            .page("https://b.test/", &["https://c.test/"])
            .page("https://c.test/", &["https://d.test/"])
            .page("https://d.test/", &[]);

        let report = crawl(Strategy::DepthFirst, "https://a.test/", &CrawlOptions::new(3), Arc::new(fetcher))
            .await
            .unwrap();

        assert_eq!(report.stats.visited, 4);
        assert_eq!(report.stats.reexpanded, 1);
    }

    #[tokio::test]
    async fn test_unknown_strategy_is_a_no_op() {
        let fetcher = scenario();
        let counts = fetcher.counts();

        let report = crawl_named("sideways", "https://a.test/", &CrawlOptions::new(2), Arc::new(fetcher))
            .await
            .unwrap();

        assert!(report.is_none());
        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn test_short_strategy_names_parse() {
        assert_eq!("dfs".parse::<Strategy>(), Ok(Strategy::DepthFirst));
        assert_eq!("bfs".parse::<Strategy>(), Ok(Strategy::BreadthFirst));
        assert_eq!("bfs concurrent".parse::<Strategy>(), Ok(Strategy::BreadthFirstConcurrent));
        assert_eq!("BFS-Concurrent".parse::<Strategy>(), Ok(Strategy::BreadthFirstConcurrent));

        let report = crawl_named("bfs", "https://a.test/", &CrawlOptions::new(2), Arc::new(scenario()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.strategy, Strategy::BreadthFirst);
        assert_eq!(report.pages.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_options_are_rejected_before_crawling() {
        let fetcher = scenario();
        let counts = fetcher.counts();
        let options = CrawlOptions::new(2).with_workers(0);

        let result = crawl(Strategy::BreadthFirstConcurrent, "https://a.test/", &options, Arc::new(fetcher)).await;

        assert!(matches!(result, Err(CrawlError::InvalidOptions(_))));
        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_crawl_ignores_pool_settings() {
        let options = CrawlOptions::new(2).with_workers(0).with_frontier_capacity(0);

        for strategy in [Strategy::DepthFirst, Strategy::BreadthFirst] {
            let report = crawl(strategy, "https://a.test/", &options, Arc::new(scenario()))
                .await
                .unwrap();
            assert_eq!(report.pages.len(), 3, "{strategy}");
        }
    }

    #[tokio::test]
    async fn test_report_serializes_without_bodies() {
        let report = crawl(Strategy::BreadthFirst, "https://a.test/", &CrawlOptions::new(1), Arc::new(scenario()))
            .await
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["strategy"], "breadth-first");
        assert_eq!(json["stats"]["visited"], 1);
        let page = &json["pages"]["https://a.test/"];
        assert_eq!(page["found_links"][0], "https://b.test/");
        assert!(page.get("body").is_none());
    }
}
