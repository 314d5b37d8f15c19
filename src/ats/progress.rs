// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Batch progress tracking.
//!
//! Uses atomics so it is safe to update from rayon worker threads.

use core::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct BatchProgress {
    done: AtomicUsize,
    failed: AtomicUsize,
    total: usize,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self { done: AtomicUsize::new(0), failed: AtomicUsize::new(0), total }
    }

    /// Count one finished task. Returns the number finished so far.
    pub fn record(&self, ok: bool) -> usize {
        if !ok {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        // Never report more than total, even if called too often.
        let prev = self
            .done
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |d| {
                if d < self.total { Some(d + 1) } else { Some(d) }
            })
            .unwrap_or(self.total);
        (prev + 1).min(self.total)
    }

    /// Read the current (done, total).
    pub fn get(&self) -> (usize, usize) {
        (self.done.load(Ordering::Relaxed), self.total)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.done.load(Ordering::Relaxed) >= self.total
    }
}
