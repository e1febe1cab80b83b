// SPDX-License-Identifier: MIT
//
// Wordgen: Exhaustive Candidate Word Enumeration
// Copyright (c) 2025 Wordgen Contributors

//! Wordgen - Command-line front end for the word generator
//!
//! Enumerates every word over a charset within a length range, optionally
//! printing each one, and reports throughput while it runs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    buffer     ┌──────────────┐    batches     ┌──────────────┐
//! │   Producer   │ ─────────────>│   WordGen    │ ──────────────>│   Consumer   │
//! │   (thread)   │  (slot ring)  │   (engine)   │  (blocking)    │   (stdout)   │
//! └──────────────┘               └──────────────┘                └──────────────┘
//! ```
//!
//! # Features
//!
//! - Configuration from flags, a YAML file or `WORDGEN_*` environment variables
//! - Theoretical total computed up front
//! - Progress reporting once a second
//! - Graceful shutdown on SIGINT/SIGTERM, draining already buffered words

use anyhow::{Context, Result};
use clap::Parser;
use num_bigint::BigUint;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use wordgen_core::{Config, WordGen};

/// Buffer requested when nothing else is configured
const CLI_BUFFER_SIZE: usize = 8_000_000;

#[derive(Parser, Debug)]
#[command(name = "wordgen")]
#[command(about = "Wordgen - Enumerates every word over a charset", long_about = None)]
struct Args {
    /// Character set to build words from
    #[arg(long)]
    charset: Option<String>,

    /// Minimum word length
    #[arg(long)]
    min: Option<usize>,

    /// Maximum word length
    #[arg(long)]
    max: Option<usize>,

    /// Word to resume enumeration from
    #[arg(long)]
    initial: Option<String>,

    /// Requested buffer capacity in words (rounded up to a power of two)
    #[arg(long)]
    buffer_size: Option<usize>,

    /// Words fetched per batch
    #[arg(long, default_value_t = 1000)]
    batch_size: usize,

    /// Print each generated word (warning: high output volume)
    #[arg(long)]
    print: bool,

    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load configuration from environment variables
    #[arg(long, default_value = "false")]
    env_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Resolve configuration: file or environment first, then flags on top
    fn load_config(&self) -> Result<Config> {
        let mut config = if let Some(path) = &self.config {
            info!("Loading configuration from file: {:?}", path);
            Config::from_file(path).context("Failed to load configuration from file")?
        } else if self.env_mode {
            info!("Loading configuration from environment variables");
            Config::from_env().context("Failed to load configuration from environment")?
        } else {
            Config {
                min_len: 1,
                max_len: 5,
                buffer_size: CLI_BUFFER_SIZE,
                ..Default::default()
            }
        };

        if let Some(charset) = &self.charset {
            config.charset = charset.clone();
        }
        if let Some(min) = self.min {
            config.min_len = min;
        }
        if let Some(max) = self.max {
            config.max_len = max;
        }
        if let Some(initial) = &self.initial {
            config.initial_state = Some(initial.clone());
        }
        if let Some(buffer_size) = self.buffer_size {
            config.buffer_size = buffer_size;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    info!("Wordgen v{}", wordgen_core::VERSION);

    let config = args.load_config()?;
    let generator = WordGen::new(config).context("Failed to create generator")?;

    let charset = generator.charset();
    let config = generator.config();
    info!(
        "Character set: {} ({} symbols)",
        String::from_utf8_lossy(charset.as_bytes()),
        charset.radix()
    );
    info!("Length range: {} to {} symbols", config.min_len, config.max_len);
    if let Some(initial) = &config.initial_state {
        info!("Resuming from: {}", initial);
    }
    info!("Buffer capacity: {} words", generator.capacity());
    info!(
        "Theoretical total: {} words",
        format_total(&charset.search_space_exact(config.min_len, config.max_len))
    );

    let cancel = CancellationToken::new();
    let completion = generator
        .start(cancel.clone())
        .context("Failed to start generator")?;

    let signal_handle = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match wait_for_shutdown().await {
                Ok(()) => {
                    info!("Shutdown signal received, draining buffered words...");
                    cancel.cancel();
                }
                Err(e) => warn!("Signal handling unavailable: {}", e),
            }
        })
    };

    let progress_handle = {
        let generator = generator.clone();
        tokio::spawn(async move { progress_loop(generator).await })
    };

    let drain_handle = {
        let generator = generator.clone();
        let batch_size = args.batch_size.max(1);
        let print = args.print;
        tokio::task::spawn_blocking(move || drain(&generator, batch_size, print))
    };

    match drain_handle.await.context("Consumer task panicked")? {
        Ok(count) => info!("Consumed {} words", count),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            warn!("Output closed, stopping generator");
            generator.stop();
        }
        Err(e) => {
            error!("Failed to write words: {}", e);
            generator.stop();
            return Err(e).context("Failed to write words");
        }
    }

    completion.await.context("Generator failed")?;

    progress_handle.abort();
    signal_handle.abort();

    let stats = generator.stats();
    info!("Generation complete!");
    info!("Total words generated: {}", stats.produced);
    info!("Time taken: {:?}", stats.elapsed);
    info!(
        "Generation speed: {} words/sec",
        format_count(stats.words_per_second() as u64)
    );

    Ok(())
}

fn init_tracing(args: &Args) {
    let log_level = args
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    let builder = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr);

    if args.json_logs {
        builder.with_thread_ids(true).json().init();
    } else {
        builder.init();
    }
}

/// Pull words in batches until the sequence ends
///
/// Runs on a blocking thread; returns the number of words consumed.
fn drain(generator: &WordGen, batch_size: usize, print: bool) -> io::Result<u64> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut batch = vec![Vec::new(); batch_size];
    let mut total = 0u64;

    loop {
        let count = generator.batch(&mut batch);
        total += count as u64;

        if print {
            for word in &batch[..count] {
                out.write_all(word)?;
                out.write_all(b"\n")?;
            }
        }

        if count < batch.len() {
            break;
        }
    }

    out.flush()?;
    Ok(total)
}

/// Log throughput once a second
async fn progress_loop(generator: WordGen) {
    let mut ticker = interval(Duration::from_secs(1));
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let stats = generator.stats();
        info!(
            "Progress: {} words, {} words/sec, buffer {:?}",
            stats.produced,
            format_count(stats.words_per_second() as u64),
            generator.watermark()
        );
    }
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use futures::stream::StreamExt;
        use signal_hook::consts::signal::*;
        use signal_hook_tokio::Signals;

        let mut signals =
            Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;

        if let Some(signal) = signals.next().await {
            info!("Received signal: {:?}", signal);
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        info!("Received Ctrl+C signal");
    }

    Ok(())
}

/// Compact rendering with K/M/B suffixes
fn format_count(n: u64) -> String {
    match n {
        n if n < 1_000 => n.to_string(),
        n if n < 1_000_000 => format!("{:.1}K", n as f64 / 1e3),
        n if n < 1_000_000_000 => format!("{:.1}M", n as f64 / 1e6),
        n => format!("{:.1}B", n as f64 / 1e9),
    }
}

/// Render the search space size, exactly once it no longer fits in a `u64`
fn format_total(total: &BigUint) -> String {
    match u64::try_from(total) {
        Ok(n) => format_count(n),
        Err(_) => total.to_string(),
    }
}
