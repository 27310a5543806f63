// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing), more verbose with --debug
// 3. Validate the seed URL and run the crawl with the chosen strategy
// 4. Print the pages found, as a table or as JSON
// 5. Exit with proper code (0 = done, 1 = nothing could be fetched, 2 = error)
// =============================================================================

mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use cli::Cli;
use link_spider::{crawl_named, CrawlReport, HttpFetcher};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let seed = Url::parse(&cli.url).with_context(|| format!("Invalid URL '{}'", cli.url))?;
    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(anyhow!("Seed URL must be http or https: {}", cli.url));
    }

    let options = cli.crawl_options();
    let fetcher = Arc::new(HttpFetcher::new(&options)?);

    // The seed is crawled exactly as typed; URLs are compared as plain strings
    let start = Instant::now();
    let Some(report) = crawl_named(&cli.strategy, &cli.url, &options, fetcher).await? else {
        println!("None selected... (expected dfs, bfs or bfs-concurrent)");
        return Ok(0);
    };
    let elapsed = start.elapsed();

    print_report(&report, cli.json)?;
    if !cli.json {
        println!(
            "Results in {:?} at search depth {} performing {}",
            elapsed, report.max_depth, report.strategy
        );
    }

    if report.pages.is_empty() {
        Ok(1)
    } else {
        Ok(0)
    }
}

// RUST_LOG wins if set; otherwise info, or debug with --debug
fn init_tracing(debug: bool) {
    let default_filter = if debug { "link_spider=debug" } else { "link_spider=info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &CrawlReport) {
    println!("{:<60} {:<40}", "URL", "TITLE");
    println!("{}", "=".repeat(100));

    for (url, page) in &report.pages {
        println!("{:<60} {:<40}", truncate(url, 57), truncate(&page.title, 37));
    }

    println!();

    let stats = &report.stats;
    println!("📊 Summary:");
    println!("   ✅ Visited: {}", stats.visited);
    println!("   ❌ Failed: {}", stats.failed);
    println!("   🔁 Duplicates skipped: {}", stats.duplicates);
    println!("   📏 Depth reached: {}", stats.depth_exhausted);
    println!("   ↪️  Re-expanded via shorter path: {}", stats.reexpanded);
    println!("   🗑️  Dropped (frontier full): {}", stats.dropped);
}

// Cuts on a char boundary so multi-byte titles don't panic
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate("https://a.test/", 57), "https://a.test/");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("ééééé", 3), "ééé...");
    }
}
