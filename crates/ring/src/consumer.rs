// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drains events from the ring and dispatches them to the per-path
//! callback looked up by the caller, isolating callback panics.

use crate::ring::Ring;
use crate::strategy::{ResolvedStrategy, LARGE_BATCH_UNROLL};
use argus_core::{ErrorHandler, FileChangeEvent};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Looks up the callback registered for an event's path. Implemented by
/// the watcher crate, which owns the watched-file table.
pub trait CallbackLookup {
    fn dispatch(&self, event: &FileChangeEvent);
}

/// Drains at most one batch (sized per `strategy`) from `ring`, invoking
/// `lookup.dispatch` for each event. Returns the number of events drained.
/// A panicking callback is caught and reported through `on_error` rather
/// than propagated — the drain loop always continues to the next event.
pub fn drain_batch(
    ring: &Ring,
    strategy: ResolvedStrategy,
    lookup: &impl CallbackLookup,
    on_error: &ErrorHandler,
) -> usize {
    match strategy {
        ResolvedStrategy::SingleEvent => drain_up_to(ring, 1, lookup, on_error),
        ResolvedStrategy::SmallBatch => drain_up_to(ring, strategy.max_batch(), lookup, on_error),
        ResolvedStrategy::LargeBatch => drain_unrolled(ring, lookup, on_error),
    }
}

fn dispatch_one(event: &FileChangeEvent, lookup: &impl CallbackLookup, on_error: &ErrorHandler) {
    let result = catch_unwind(AssertUnwindSafe(|| lookup.dispatch(event)));
    if let Err(panic) = result {
        let message = panic_message(&panic);
        on_error(argus_core::ArgusError::Configuration(format!(
            "callback panicked for {}: {message}",
            event.path_str()
        )));
    }
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn drain_up_to(
    ring: &Ring,
    max: usize,
    lookup: &impl CallbackLookup,
    on_error: &ErrorHandler,
) -> usize {
    let mut drained = 0;
    while drained < max {
        match ring.try_pop() {
            Some(event) => {
                dispatch_one(&event, lookup, on_error);
                drained += 1;
            }
            None => break,
        }
    }
    drained
}

/// Drains in groups of [`LARGE_BATCH_UNROLL`] to reduce per-event loop
/// overhead under high watched-file counts, falling back to single pops
/// for the remainder of a partial group.
fn drain_unrolled(ring: &Ring, lookup: &impl CallbackLookup, on_error: &ErrorHandler) -> usize {
    let mut drained = 0;
    let max = ResolvedStrategy::LargeBatch.max_batch();
    'outer: while drained + LARGE_BATCH_UNROLL <= max {
        let mut group = [None, None, None, None];
        for slot in group.iter_mut() {
            *slot = ring.try_pop();
            if slot.is_none() {
                break;
            }
        }
        let mut got_any = false;
        for slot in group.into_iter().flatten() {
            dispatch_one(&slot, lookup, on_error);
            drained += 1;
            got_any = true;
        }
        if !got_any || drained % LARGE_BATCH_UNROLL != 0 {
            break 'outer;
        }
    }
    drained += drain_up_to(ring, max.saturating_sub(drained), lookup, on_error);
    drained
}

#[cfg(test)]
#[path = "consumer_tests.rs"]
mod tests;
