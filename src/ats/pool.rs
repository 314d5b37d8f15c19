// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bounded, best-effort worker pool for independent tool invocations.
//!
//! Every task runs to completion and yields its own [`TaskOutcome`]; a
//! failing task is logged and never stops the rest of the batch. [`run`]
//! returns once all tasks are done. There is no cancellation and no timeout.
//!
//! With the `parallel` feature, tasks run on a dedicated rayon pool of the
//! configured size; without it they run one after another.
//!
//! [`run`]: WorkerPool::run

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::error::Result;
#[cfg(feature = "parallel")]
use super::error::AtsError;
use super::progress::BatchProgress;

/// Result of one task, tagged with the label it was submitted under.
#[derive(Debug)]
pub struct TaskOutcome<T> {
    pub label: String,
    pub result: Result<T>,
}

/// All outcomes of a batch, in submission order.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub outcomes: Vec<TaskOutcome<T>>,
}

impl<T> BatchReport<T> {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Labels of the failed tasks.
    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter(|o| o.result.is_err()).map(|o| o.label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

pub struct WorkerPool {
    workers: usize,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Pool with `workers` concurrent tasks (at least 1).
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        #[cfg(feature = "parallel")]
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ats-worker-{i}"))
            .build()
            .map_err(|e| AtsError::Pool(e.to_string()))?;
        Ok(Self {
            workers,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `work` on every `(label, input)` pair and wait for all of them.
    pub fn run<I, T, F>(&self, batch: &str, tasks: Vec<(String, I)>, work: F) -> BatchReport<T>
    where
        I: Send,
        T: Send,
        F: Fn(I) -> Result<T> + Sync + Send,
    {
        let progress = BatchProgress::new(tasks.len());
        log::info!("{batch}: {} tasks on {} workers", tasks.len(), self.workers);

        let run_one = |(label, input): (String, I)| {
            let result = work(input);
            let done = progress.record(result.is_ok());
            match &result {
                Ok(_) => log::debug!("{batch}: {label} done ({done}/{})", progress.get().1),
                Err(e) => log::warn!("{batch}: {label} failed: {e}"),
            }
            TaskOutcome { label, result }
        };

        #[cfg(feature = "parallel")]
        let outcomes: Vec<TaskOutcome<T>> =
            self.pool.install(|| tasks.into_par_iter().map(run_one).collect());
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<TaskOutcome<T>> = tasks.into_iter().map(run_one).collect();

        if progress.failed() > 0 {
            log::warn!("{batch}: {} of {} tasks failed", progress.failed(), outcomes.len());
        } else {
            log::info!("{batch}: all {} tasks finished", outcomes.len());
        }
        BatchReport { outcomes }
    }
}
