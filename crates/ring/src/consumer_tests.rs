// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use argus_core::ChangeKind;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

struct RecordingLookup {
    seen: Mutex<Vec<String>>,
    panic_on: Option<String>,
}

impl CallbackLookup for RecordingLookup {
    fn dispatch(&self, event: &FileChangeEvent) {
        if Some(event.path_str().to_string()) == self.panic_on {
            panic!("simulated callback panic");
        }
        self.seen.lock().push(event.path_str().to_string());
    }
}

fn no_op_error_handler() -> ErrorHandler {
    std::sync::Arc::new(|_| {})
}

fn event(path: &str) -> FileChangeEvent {
    FileChangeEvent::new(Path::new(path), 0, 0, ChangeKind::Modified)
}

#[test]
fn single_event_strategy_drains_exactly_one() {
    let ring = Ring::new(8);
    ring.try_push(event("/a")).ok().unwrap();
    ring.try_push(event("/b")).ok().unwrap();
    let lookup = RecordingLookup {
        seen: Mutex::new(Vec::new()),
        panic_on: None,
    };
    let drained = drain_batch(&ring, ResolvedStrategy::SingleEvent, &lookup, &no_op_error_handler());
    assert_eq!(drained, 1);
    assert_eq!(*lookup.seen.lock(), vec!["/a".to_string()]);
}

#[test]
fn small_batch_drains_up_to_its_cap_in_order() {
    let ring = Ring::new(16);
    for i in 0..5 {
        ring.try_push(event(&format!("/f{i}"))).ok().unwrap();
    }
    let lookup = RecordingLookup {
        seen: Mutex::new(Vec::new()),
        panic_on: None,
    };
    let drained = drain_batch(&ring, ResolvedStrategy::SmallBatch, &lookup, &no_op_error_handler());
    assert_eq!(drained, 5);
    assert_eq!(
        *lookup.seen.lock(),
        vec!["/f0", "/f1", "/f2", "/f3", "/f4"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
}

#[test]
fn large_batch_drains_more_than_one_unrolled_group() {
    let ring = Ring::new(128);
    for i in 0..10 {
        ring.try_push(event(&format!("/g{i}"))).ok().unwrap();
    }
    let lookup = RecordingLookup {
        seen: Mutex::new(Vec::new()),
        panic_on: None,
    };
    let drained = drain_batch(&ring, ResolvedStrategy::LargeBatch, &lookup, &no_op_error_handler());
    assert_eq!(drained, 10);
    assert_eq!(lookup.seen.lock().len(), 10);
}

#[test]
fn a_panicking_callback_is_isolated_and_reported() {
    let ring = Ring::new(8);
    ring.try_push(event("/ok-before")).ok().unwrap();
    ring.try_push(event("/boom")).ok().unwrap();
    ring.try_push(event("/ok-after")).ok().unwrap();

    let lookup = RecordingLookup {
        seen: Mutex::new(Vec::new()),
        panic_on: Some("/boom".to_string()),
    };
    let errors = Arc::new(Mutex::new(Vec::new()));
    let errors_clone = errors.clone();
    let on_error: ErrorHandler = Arc::new(move |e| errors_clone.lock().push(e.to_string()));

    let drained = drain_batch(&ring, ResolvedStrategy::SmallBatch, &lookup, &on_error);

    assert_eq!(drained, 3);
    assert_eq!(*lookup.seen.lock(), vec!["/ok-before", "/ok-after"]);
    assert_eq!(errors.lock().len(), 1);
    assert!(errors.lock()[0].contains("/boom"));
}
