// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `argus` - a minimal front door over `argus-daemon`: load settings from
//! a TOML file, register a handful of paths, and print what gets
//! dispatched. Not a reimplementation of a production CLI shell — see
//! `argusd` for the long-running daemon.

use anyhow::{Context, Result};
use argus_core::{ChangeKind, FileChangeEvent, Settings};
use argus_daemon::Argus;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "argus", version, about = "Dynamic configuration watcher - CLI front door")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load settings, register the given paths, run for a bounded
    /// duration printing dispatched events, then print audit stats.
    Run(RunArgs),
    /// Parse a single config file and report whether it's well-formed.
    Check(CheckArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// TOML settings file. Defaults to compiled-in defaults if omitted.
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// How long to run before stopping and reporting stats.
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    duration: Duration,

    /// Paths to watch.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Config file to parse.
    path: PathBuf,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Check(args) => check(args),
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let settings = match args.settings {
        Some(path) => Settings::load_file(&path).context("loading settings file")?,
        None => Settings::default(),
    };

    let argus = Argus::new(settings).context("constructing Argus")?;
    let dispatched = Arc::new(AtomicUsize::new(0));

    for path in &args.paths {
        let dispatched = dispatched.clone();
        let callback: argus_core::FileCallback = Arc::new(move |event: &FileChangeEvent| {
            dispatched.fetch_add(1, Ordering::Relaxed);
            println!("{} {}", change_kind_label(event.kind()), event.path_str());
        });
        argus
            .register(path, callback)
            .with_context(|| format!("registering {}", path.display()))?;
    }

    argus.start().context("starting watcher")?;
    tokio::time::sleep(args.duration).await;
    argus.graceful_stop(Duration::from_secs(5)).await;

    let introspection = argus.introspect();
    println!("--- stats ---");
    println!("events dispatched: {}", dispatched.load(Ordering::Relaxed));
    println!("ring overflow count: {}", introspection.ring_overflow_count);
    if let Some(audit) = introspection.audit {
        println!(
            "audit: written={} filtered={} write_errors={}",
            audit.written, audit.filtered, audit.write_errors
        );
    }

    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.path).context("reading config file")?;
    match argus_formats::parse_file(&args.path, &content) {
        Ok(value) => {
            println!("{} is well-formed", args.path.display());
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            println!("{} failed to parse: {e}", args.path.display());
            std::process::exit(1);
        }
    }
}

fn change_kind_label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Created => "created",
        ChangeKind::Modified => "modified",
        ChangeKind::Deleted => "deleted",
        ChangeKind::Error => "error",
    }
}
