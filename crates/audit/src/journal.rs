// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text journal backend: an append-only JSONL file, one `AuditEvent` per
//! line. Writes are buffered in memory and flushed as a single batch —
//! either when the buffer fills or when the caller asks for it — with one
//! `fsync` per flush rather than one per event.

use crate::backend::AuditBackend;
use crate::error::AuditError;
use argus_core::AuditEvent;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct TextJournalBackend {
    file: File,
    path: PathBuf,
    buffer: Vec<u8>,
    buffered_count: usize,
    buffer_size: usize,
    closed: bool,
}

impl TextJournalBackend {
    pub fn open(path: &Path, buffer_size: usize) -> Result<Self, AuditError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            buffer: Vec::new(),
            buffered_count: 0,
            buffer_size: buffer_size.max(1),
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditBackend for TextJournalBackend {
    fn write(&mut self, event: &AuditEvent) -> Result<(), AuditError> {
        if self.closed {
            return Err(AuditError::Closed);
        }
        serde_json::to_writer(&mut self.buffer, event)?;
        self.buffer.push(b'\n');
        self.buffered_count += 1;
        if self.buffered_count >= self.buffer_size {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AuditError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.file.write_all(&self.buffer)?;
        self.file.sync_all()?;
        self.buffer.clear();
        self.buffered_count = 0;
        Ok(())
    }

    fn close(&mut self) -> Result<(), AuditError> {
        if self.closed {
            return Ok(());
        }
        self.flush()?;
        self.closed = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "text-journal"
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
