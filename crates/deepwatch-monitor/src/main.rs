//! deepwatch-monitor
//!
//! DPR halving statistics from the command line.
//!
//! Flow:
//!   1. Connect to a Deeper Network node over WebSocket
//!   2. Read total issuance at the head and seven days of blocks back
//!   3. Print the halving record (text or JSON lines)
//!   4. Without --once: keep refreshing on an interval until ctrl-c

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};

use deepwatch_client::{ChainClient, ChainSource, ClientConfig};
use deepwatch_core::constants::{DATA_REFRESH_INTERVAL, MAINNET_ENDPOINT};
use deepwatch_core::format::{format_dpr, group_thousands};
use deepwatch_core::{Amount, HalvingStats, TimeLeft};
use deepwatch_engine::{estimated_date, progress_percent, EngineConfig, HalvingEngine};

#[derive(Parser, Debug)]
#[command(
    name = "deepwatch-monitor",
    version,
    about = "Deeper Network halving countdown and issuance watcher"
)]
struct Args {
    /// WebSocket endpoint of a Deeper Network node.
    #[arg(long, default_value = MAINNET_ENDPOINT)]
    endpoint: String,

    /// Seconds between refreshes in watch mode.
    #[arg(long, default_value_t = DATA_REFRESH_INTERVAL.as_secs())]
    interval: u64,

    /// Fetch one record, print it, exit.
    #[arg(long)]
    once: bool,

    /// Print records as JSON lines instead of text.
    #[arg(long)]
    json: bool,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Refresh attempts per cycle.
    #[arg(long, default_value_t = 3)]
    retries: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,deepwatch=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let client_config = ClientConfig {
        endpoint: args.endpoint.clone(),
        request_timeout: Duration::from_secs(args.timeout),
        ..ClientConfig::default()
    };
    let engine_config = EngineConfig {
        max_retries: args.retries,
        api_timeout: Duration::from_secs(args.timeout),
        ..EngineConfig::default()
    };

    let client = Arc::new(ChainClient::new(client_config));
    info!(endpoint = %client.endpoint(), "deepwatch starting");
    client
        .connect()
        .await
        .context("establishing chain connection")?;

    let engine = Arc::new(HalvingEngine::new(Arc::clone(&client), engine_config));

    if args.once {
        let stats = engine
            .get_stats(true)
            .await
            .context("fetching halving statistics")?;
        print_record(&stats, args.json)?;
        client.disconnect().await;
        return Ok(());
    }

    // ── Watch mode ────────────────────────────────────────────────────────────
    let interval = Duration::from_secs(args.interval.max(1));
    let json = args.json;
    let subscription = Arc::clone(&engine).subscribe(interval, move |result| match result {
        Ok(stats) => {
            if let Err(e) = print_record(&stats, json) {
                warn!(error = %e, "failed to print record");
            }
        }
        Err(e) => warn!(error = %e, "refresh failed"),
    });

    // First record right away; the ticks take over from here.
    match engine.get_stats(true).await {
        Ok(stats) => print_record(&stats, json)?,
        Err(e) => warn!(error = %e, "initial fetch failed"),
    }

    info!(interval_secs = interval.as_secs(), "watching; ctrl-c to stop");
    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    info!("shutting down");
    subscription.cancel();
    client.disconnect().await;
    Ok(())
}

/// Renders one record. JSON mode emits the serde shape unchanged; text mode
/// shifts amounts to whole DPR for human eyes.
fn print_record(stats: &HalvingStats, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(stats)?);
        return Ok(());
    }

    let current: Amount = stats.current_issuance.parse()?;
    let remaining: Amount = stats.remaining_amount.parse()?;
    let daily: Amount = stats.average_daily_increase.parse()?;
    let phase = stats.halving_phase;
    let target = phase.target();

    println!();
    println!("{}", phase.title());
    println!("  current issuance   {} DPR", format_dpr(&current));
    println!("  target             {} DPR", format_dpr(target));
    println!("  remaining          {} DPR", format_dpr(&remaining));
    println!("  daily increase     {} DPR", format_dpr(&daily));
    println!("  progress           {}%", progress_percent(&current, target));
    match estimated_date(stats.estimated_days, Utc::now()) {
        Ok(date) => {
            let left = TimeLeft::until(date, Utc::now());
            println!(
                "  estimated days     {}",
                group_thousands(&stats.estimated_days.to_string())
            );
            println!("  estimated date     {}", date.format("%Y-%m-%d"));
            println!("  time left          {left}");
        }
        Err(_) => println!("  estimated days     unbounded (no growth in window)"),
    }
    Ok(())
}
