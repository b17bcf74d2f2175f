//! Lectern: fetch, classify and list long-form Nostr articles.
//!
//! Connects to the configured relay set, runs one fetch cycle (or a
//! `--watch` loop), turns the deduplicated events into posts and prints
//! them, newest first by default.
//!
//! # Usage
//!
//! ```bash
//! # One-shot fetch with the default relay set
//! lectern
//!
//! # Only Habla articles, oldest first, as JSON
//! lectern --source habla --sort oldest --json
//!
//! # Keep refreshing every five minutes against two relays
//! lectern --relays wss://relay.damus.io,wss://nos.lol --watch 300
//! ```

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lectern_core::{apply_view, build_posts, ExtractorConfig, Post, SortMode, SourceFilter};
use lectern_reader::metrics::{init_metrics, start_metrics_server};
use lectern_reader::{default_filters, FetchConfig, Fetcher, PoolConfig, RelayPool, DEFAULT_RELAYS};

/// Long-form Nostr reader.
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(about = "Fetch, classify and list long-form Nostr articles")]
#[command(version)]
struct Args {
    /// Relay URLs (comma-separated, overrides the default set)
    #[arg(long, value_delimiter = ',')]
    relays: Option<Vec<String>>,

    /// Connect timeout per relay, in milliseconds
    #[arg(long, default_value = "10000")]
    connect_timeout_ms: u64,

    /// Query timeout per relay, in milliseconds
    #[arg(long, default_value = "10000")]
    query_timeout_ms: u64,

    /// Look-back window for the primary filter, in days
    #[arg(long, default_value = "30")]
    since_days: u64,

    /// Result limit for the primary filter
    #[arg(long, default_value = "100")]
    limit: usize,

    /// Result limit for each tag-scoped filter
    #[arg(long, default_value = "50")]
    tag_limit: usize,

    /// Minimum content length (characters) for a post
    #[arg(long, default_value = "100")]
    min_content_chars: usize,

    /// Maximum derived title length (characters)
    #[arg(long, default_value = "60")]
    title_max: usize,

    /// Maximum derived summary length (characters)
    #[arg(long, default_value = "200")]
    summary_max: usize,

    /// Source filter: all, highlighter, habla or unknown
    #[arg(long, default_value = "all", value_parser = SourceFilter::from_str)]
    source: SourceFilter,

    /// Sort mode: newest or oldest
    #[arg(long, default_value = "newest", value_parser = SortMode::from_str)]
    sort: SortMode,

    /// Print posts as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Refresh interval in seconds; runs once when omitted
    #[arg(long)]
    watch: Option<u64>,

    /// Metrics HTTP server port (0 to disable)
    #[arg(long, default_value = "0")]
    metrics_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required when both ring and aws-lc-rs are present)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("info".parse().expect("valid directive"))
                .add_directive("lectern_reader=debug".parse().expect("valid directive")),
        )
        .init();

    let args = Args::parse();

    if args.metrics_port > 0 {
        let handle = init_metrics();
        start_metrics_server(args.metrics_port, handle)
            .await
            .context("Failed to start metrics server")?;
    }

    let relay_urls: Vec<String> = args
        .relays
        .clone()
        .unwrap_or_else(|| DEFAULT_RELAYS.iter().map(|s| s.to_string()).collect());

    let pool_config = PoolConfig {
        connect_timeout: Duration::from_millis(args.connect_timeout_ms),
        query_timeout: Duration::from_millis(args.query_timeout_ms),
    };
    let pool = Arc::new(
        RelayPool::new(&relay_urls, pool_config).context("Invalid relay configuration")?,
    );

    let summary = pool.initialize().await;
    if summary.connected == 0 {
        tracing::warn!(
            "no relay connections established ({} attempted); fetches will fail until a reconnect succeeds",
            summary.attempted
        );
    }

    let fetch_config = FetchConfig {
        since_window: Duration::from_secs(args.since_days * 24 * 60 * 60),
        primary_limit: args.limit,
        tagged_limit: args.tag_limit,
        ..Default::default()
    };
    let extractor = ExtractorConfig {
        min_content_chars: args.min_content_chars,
        title_max: args.title_max,
        summary_max: args.summary_max,
        ..Default::default()
    };
    let fetcher = Fetcher::new(Arc::clone(&pool));

    match args.watch {
        None => {
            run_cycle(&fetcher, &fetch_config, &extractor, &args).await?;
            pool.shutdown().await;
        }
        Some(interval_secs) => {
            let monitor = pool.spawn_monitor(Duration::from_secs(30));
            loop {
                if let Err(e) = run_cycle(&fetcher, &fetch_config, &extractor, &args).await {
                    tracing::warn!("fetch cycle failed: {e:#}; retrying on next tick");
                }
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_secs(interval_secs)) => {}
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("shutdown signal received");
                        break;
                    }
                }
            }
            monitor.abort();
            pool.shutdown().await;
        }
    }

    Ok(())
}

/// One fetch cycle: query, classify, filter/sort, print.
async fn run_cycle(
    fetcher: &Fetcher,
    fetch_config: &FetchConfig,
    extractor: &ExtractorConfig,
    args: &Args,
) -> Result<()> {
    let filters = default_filters(fetch_config);
    let events = fetcher
        .fetch_all(&filters)
        .await
        .context("Fetch cycle failed")?;

    let posts = build_posts(&events, extractor);
    let view = apply_view(&posts, args.source, args.sort);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("Failed to encode posts as JSON")?
        );
    } else {
        render_text(&view);
    }

    Ok(())
}

/// Plain-text listing of a post view.
fn render_text(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts found.");
        return;
    }

    for post in posts {
        let date = chrono::DateTime::from_timestamp(post.published_at as i64, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown date".to_string());

        println!("{} - {} ({})", post.title, post.author, date);
        println!(
            "  {} (confidence {:.1}) | {} words | {} min read",
            post.source.label(),
            post.source_confidence,
            post.word_count,
            post.read_minutes
        );
        if !post.summary.is_empty() {
            println!("  {}", post.summary);
        }
        if !post.topics.is_empty() {
            println!("  #{}", post.topics.join(" #"));
        }
        println!();
    }

    println!("{} post(s)", posts.len());
}
