// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `argusd`: loads settings, registers the configured watch paths, and
//! runs until interrupted.

use anyhow::{Context, Result};
use argus_core::{ChangeKind, FileChangeEvent, Settings};
use argus_daemon::Argus;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SETTINGS_PATH_ENV: &str = "ARGUS_SETTINGS_FILE";
const WATCH_PATHS_ENV: &str = "ARGUS_WATCH_PATHS";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

fn load_settings() -> Result<Settings> {
    let mut settings = match std::env::var(SETTINGS_PATH_ENV) {
        Ok(path) => Settings::load_file(&PathBuf::from(path)).context("loading settings file")?,
        Err(_) => Settings::default(),
    };
    settings.apply_env().context("applying ARGUS_ environment overrides")?;
    Ok(settings)
}

fn watch_paths_from_env() -> Vec<PathBuf> {
    std::env::var(WATCH_PATHS_ENV)
        .ok()
        .map(|raw| raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(PathBuf::from).collect())
        .unwrap_or_default()
}

fn log_event(event: &FileChangeEvent) {
    match event.kind() {
        ChangeKind::Created => tracing::info!(path = event.path_str(), "file created"),
        ChangeKind::Modified => tracing::info!(path = event.path_str(), "file modified"),
        ChangeKind::Deleted => tracing::info!(path = event.path_str(), "file deleted"),
        ChangeKind::Error => tracing::warn!(path = event.path_str(), "error observing file"),
    }

    if matches!(event.kind(), ChangeKind::Created | ChangeKind::Modified) {
        validate_config_syntax(Path::new(event.path_str()));
    }
}

/// Best-effort parse of a changed config file, purely to surface syntax
/// errors early in the log. Parse failures are not fatal: the file may be
/// mid-write, or the extension may be one Argus only recognizes but can't
/// parse (`.ini`, `.properties`).
fn validate_config_syntax(path: &Path) {
    let Some(format) = argus_formats::Format::from_extension(path) else {
        return;
    };
    let Ok(content) = std::fs::read_to_string(path) else {
        return;
    };
    match argus_formats::parse_file(path, &content) {
        Ok(_) => tracing::debug!(path = %path.display(), %format, "config file parsed cleanly"),
        Err(argus_formats::FormatError::Unsupported { .. }) => {}
        Err(e) => tracing::warn!(path = %path.display(), %format, error = %e, "config file failed to parse"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let settings = load_settings()?;
    let argus = Argus::new(settings).context("constructing Argus")?;

    let paths = watch_paths_from_env();
    if paths.is_empty() {
        tracing::warn!("no paths configured via {WATCH_PATHS_ENV}; running with nothing watched");
    }
    for path in &paths {
        let callback: argus_core::FileCallback = Arc::new(log_event);
        if let Err(e) = argus.register(path, callback) {
            tracing::error!(path = %path.display(), error = %e, "failed to register watch path");
        }
    }

    argus.start().context("starting watcher")?;
    tracing::info!(watched = argus.introspect().watched_count, "argusd running");

    wait_for_shutdown_signal().await;
    tracing::info!("shutdown signal received, draining");

    if !argus.graceful_stop(SHUTDOWN_GRACE).await {
        tracing::warn!("graceful stop did not complete within the deadline");
    }

    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let sigterm = signal(SignalKind::terminate());
    let sigint = signal(SignalKind::interrupt());
    let (mut sigterm, mut sigint) = match (sigterm, sigint) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "failed to install signal handlers, falling back to ctrl_c");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {}
        _ = sigint.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
