// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The path security gate: layered checks a path must pass before it can
//! be registered with a watcher.

use std::path::{Path, PathBuf};

const MAX_PATH_LENGTH: usize = 4096;
const MAX_PATH_COMPONENTS: usize = 50;

#[cfg(unix)]
const SYSTEM_DIRECTORIES: &[&str] = &["/etc", "/proc", "/sys", "/dev"];

#[cfg(windows)]
const SYSTEM_DIRECTORIES: &[&str] = &["system32"];

/// Why a path was rejected. The variant name doubles as the reason string
/// recorded in the security-level audit event the gate always emits on
/// rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecurityViolation {
    #[error("path is empty")]
    Empty,
    #[error("path contains a traversal token")]
    TraversalToken,
    #[error("path exceeds the maximum length of {MAX_PATH_LENGTH} characters")]
    TooLong,
    #[error("path nests more than {MAX_PATH_COMPONENTS} directory components")]
    TooDeep,
    #[error("path contains a control character")]
    ControlCharacter,
    #[error("path resolves into a system directory")]
    SystemDirectory,
    #[error("path contains an alternate-data-stream marker")]
    AlternateDataStream,
    #[error("watched-file capacity reached")]
    CapacityReached,
}

/// Runs every layered check in order, short-circuiting on the first
/// violation. `existing_count`/`max_count` drive the final capacity check;
/// callers that only want to validate the path itself can pass `(0, usize::MAX)`.
pub fn gate(path: &Path, existing_count: usize, max_count: usize) -> Result<(), SecurityViolation> {
    let raw = path.to_string_lossy();

    if raw.is_empty() {
        return Err(SecurityViolation::Empty);
    }

    if contains_traversal_token(&raw) {
        return Err(SecurityViolation::TraversalToken);
    }

    if raw.chars().count() > MAX_PATH_LENGTH {
        return Err(SecurityViolation::TooLong);
    }
    if path.components().count() > MAX_PATH_COMPONENTS {
        return Err(SecurityViolation::TooDeep);
    }

    if raw
        .chars()
        .any(|c| (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') || c as u32 == 0x7F)
    {
        return Err(SecurityViolation::ControlCharacter);
    }

    if resolves_into_system_directory(path) {
        return Err(SecurityViolation::SystemDirectory);
    }

    #[cfg(windows)]
    if contains_alternate_data_stream_marker(&raw) {
        return Err(SecurityViolation::AlternateDataStream);
    }

    if existing_count >= max_count {
        return Err(SecurityViolation::CapacityReached);
    }

    Ok(())
}

fn contains_traversal_token(raw: &str) -> bool {
    raw.split(['/', '\\']).any(|component| component == "..") || raw.contains("./") || raw.contains(".\\")
}

#[cfg(windows)]
fn contains_alternate_data_stream_marker(raw: &str) -> bool {
    // Skip the drive specifier's own colon (`C:`) before looking for a
    // second one, which marks an alternate data stream.
    match raw.find(':') {
        Some(first) => raw[first + 1..].contains(':'),
        None => false,
    }
}

/// Compares path components rather than raw prefix bytes, so `/devops/x`
/// and `/etcetera/y` don't get mistaken for paths under `/dev` or `/etc`.
fn resolves_into_system_directory(path: &Path) -> bool {
    let resolved: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let resolved_components: Vec<String> = resolved
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_ascii_lowercase())
        .collect();

    SYSTEM_DIRECTORIES.iter().any(|dir| {
        let dir_components: Vec<&str> = Path::new(dir)
            .components()
            .map(|c| c.as_os_str().to_str().unwrap_or_default())
            .collect();
        resolved_components.len() >= dir_components.len()
            && resolved_components
                .iter()
                .zip(dir_components.iter())
                .all(|(a, b)| a == &b.to_ascii_lowercase())
    })
}

#[cfg(test)]
#[path = "security_tests.rs"]
mod tests;
