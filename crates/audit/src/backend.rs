// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The storage-agnostic contract both audit backends implement.

use crate::error::AuditError;
use argus_core::AuditEvent;

/// One durable sink for audit events. Implementations buffer internally;
/// `flush` is the durability point and `close` is the final, idempotent
/// shutdown step.
pub trait AuditBackend: Send {
    fn write(&mut self, event: &AuditEvent) -> Result<(), AuditError>;
    fn flush(&mut self) -> Result<(), AuditError>;
    fn close(&mut self) -> Result<(), AuditError>;

    /// Human-readable name used in logs and introspection, e.g. `"text-journal"`.
    fn name(&self) -> &'static str;
}
