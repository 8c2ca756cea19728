// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The audit pipeline's record type and its tamper-detection checksum.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Audit severity, ordered from least to most serious so a `min_level`
/// filter can compare with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Critical,
    Security,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Critical => "critical",
            Level::Security => "security",
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "critical" => Ok(Level::Critical),
            "security" => Ok(Level::Security),
            other => Err(format!("unknown audit level: {other}")),
        }
    }
}

/// {process id, process name}, captured once at construction and stamped
/// onto every audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessIdentity {
    pub pid: u32,
    pub name: String,
}

impl ProcessIdentity {
    pub fn current() -> Self {
        let name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "argus".to_string());
        Self {
            pid: std::process::id(),
            name,
        }
    }
}

/// A structured, checksum-sealed record of a security- or
/// configuration-relevant occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp_rfc3339: String,
    pub level: Level,
    pub event: String,
    pub component: String,
    pub file_path: Option<String>,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
    pub process_id: u32,
    pub process_name: String,
    pub context: IndexMap<String, serde_json::Value>,
    pub checksum: String,
}

impl AuditEvent {
    /// Builds an event and stamps it with its own checksum, computed over
    /// the field sequence fixed by the contract: timestamp, event name,
    /// component, serialized old value, serialized new value.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp_rfc3339: String,
        level: Level,
        event: String,
        component: String,
        file_path: Option<String>,
        old_value: Option<serde_json::Value>,
        new_value: Option<serde_json::Value>,
        identity: &ProcessIdentity,
        context: IndexMap<String, serde_json::Value>,
    ) -> Self {
        let checksum = compute_checksum(
            &timestamp_rfc3339,
            &event,
            &component,
            old_value.as_ref(),
            new_value.as_ref(),
        );
        Self {
            timestamp_rfc3339,
            level,
            event,
            component,
            file_path,
            old_value,
            new_value,
            process_id: identity.pid,
            process_name: identity.name.clone(),
            context,
            checksum,
        }
    }

    /// Recomputes the checksum over this event's own fields. Integrity is
    /// verified by comparing the result against `self.checksum`.
    pub fn recompute_checksum(&self) -> String {
        compute_checksum(
            &self.timestamp_rfc3339,
            &self.event,
            &self.component,
            self.old_value.as_ref(),
            self.new_value.as_ref(),
        )
    }

    pub fn verify_checksum(&self) -> bool {
        self.recompute_checksum() == self.checksum
    }
}

/// SHA-256 over the checksum's fixed field order. The hash function choice
/// is not part of the contract — any 256-bit cryptographic hash qualifies —
/// but the field order is, and must never change without a schema bump.
fn compute_checksum(
    timestamp_rfc3339: &str,
    event: &str,
    component: &str,
    old_value: Option<&serde_json::Value>,
    new_value: Option<&serde_json::Value>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(timestamp_rfc3339.as_bytes());
    hasher.update(b"\0");
    hasher.update(event.as_bytes());
    hasher.update(b"\0");
    hasher.update(component.as_bytes());
    hasher.update(b"\0");
    if let Some(v) = old_value {
        hasher.update(v.to_string().as_bytes());
    }
    hasher.update(b"\0");
    if let Some(v) = new_value {
        hasher.update(v.to_string().as_bytes());
    }
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "audit_event_tests.rs"]
mod tests;
