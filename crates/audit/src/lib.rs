// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The dual-backend audit pipeline: a text journal and an embedded
//! database, selected per configuration with fallback if the preferred
//! backend can't be opened.

mod backend;
mod db;
mod error;
mod journal;
mod migration;
mod pipeline;

pub use backend::AuditBackend;
pub use db::{AuditDbStatistics, DbBackend};
pub use error::AuditError;
pub use journal::TextJournalBackend;
pub use migration::CURRENT_SCHEMA_VERSION;
pub use pipeline::{AuditPipeline, AuditStats};
