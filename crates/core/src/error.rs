// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy for the Argus core.

use std::path::PathBuf;

/// Errors surfaced synchronously by construction, registration, or
/// configuration loading anywhere in the core.
#[derive(Debug, thiserror::Error)]
pub enum ArgusError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("path rejected by security gate: {path} ({reason})")]
    SecurityRejected { path: PathBuf, reason: String },

    #[error("watched-file capacity reached ({max} files)")]
    CapacityReached { max: usize },

    #[error("ring buffer capacity {requested} could not be allocated: {reason}")]
    RingAllocation { requested: usize, reason: String },

    #[error("no audit backend could be opened")]
    NoAuditBackend,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A callback invoked out-of-band for errors that occur on a background
/// task (polling tick, ring consumer, audit flush) rather than in response
/// to a synchronous call.
pub type ErrorHandler = std::sync::Arc<dyn Fn(ArgusError) + Send + Sync>;
