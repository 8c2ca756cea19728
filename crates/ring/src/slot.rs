// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single ring storage cell.
//!
//! The source implementation publishes slot contents through a raw
//! pointer swap; `unsafe_code` is forbidden here, so publication instead
//! goes through a per-slot `Mutex` guarding the payload alongside the
//! sequence counter that still drives the Vyukov-style producer/consumer
//! handshake. Contention is negligible in the common single-producer,
//! single-consumer case this crate targets.

use argus_core::FileChangeEvent;
use parking_lot::Mutex;
use std::sync::atomic::AtomicUsize;

pub struct Slot {
    pub sequence: AtomicUsize,
    pub payload: Mutex<Option<FileChangeEvent>>,
}

impl Slot {
    pub fn new(initial_sequence: usize) -> Self {
        Self {
            sequence: AtomicUsize::new(initial_sequence),
            payload: Mutex::new(None),
        }
    }
}
