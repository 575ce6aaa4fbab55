//! Dedicated worker pool for CPU-bound optimization runs.
//!
//! Optimization never suspends, so it is kept off threads that serve I/O by
//! running it on a separately sized rayon pool. Each job works on its own
//! query and shares nothing with other jobs.

use crate::config::OptimizerConfig;
use crate::core::query::OptimizationQuery;
use crate::core::result::OptimizationResult;
use crate::core::validation::messages;
use crate::error::OptimizerError;
use crate::optimization::capital::{
    CancellationFlag, CapitalOptimizer, LogObserver, NoopObserver,
};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

type Outcome = Result<OptimizationResult, OptimizerError>;

pub struct OptimizerPool {
    pool: ThreadPool,
    log_rounds: bool,
}

impl OptimizerPool {
    pub fn new(config: &OptimizerConfig) -> Result<Self, OptimizerError> {
        let config = config.clone().validated()?;
        let prefix = config.thread_name_prefix;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(move |i| format!("{}-{}", prefix, i))
            .panic_handler(|_| log::error!("Optimizer worker panicked; job result dropped"))
            .build()
            .map_err(|e| OptimizerError::WorkerPool(e.to_string()))?;

        log::debug!(
            "Optimizer pool started with {} worker threads",
            pool.current_num_threads()
        );
        Ok(Self {
            pool,
            log_rounds: config.log_rounds,
        })
    }

    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Schedule one run and return a handle to its outcome.
    ///
    /// An absent query is rejected here, on the caller's thread, before any
    /// work is scheduled.
    pub fn submit(
        &self,
        query: Option<OptimizationQuery>,
    ) -> Result<PendingOptimization, OptimizerError> {
        let query = query.ok_or_else(|| {
            log::error!("Received null capital maximization query");
            OptimizerError::invalid_input(messages::NULL_QUERY)
        })?;

        log::info!(
            "Starting capital maximization with initial capital: {}",
            query.initial_capital()
        );

        let cancel = CancellationFlag::new();
        let job_cancel = cancel.clone();
        let log_rounds = self.log_rounds;
        let (sender, receiver) = mpsc::channel();

        self.pool.spawn(move || {
            let outcome = run_job(&query, log_rounds, &job_cancel);
            // The caller may have stopped waiting; nobody is left to tell.
            let _ = sender.send(outcome);
        });

        Ok(PendingOptimization { receiver, cancel })
    }

    /// Run one optimization on the pool and block until it finishes.
    pub fn run(&self, query: Option<OptimizationQuery>) -> Outcome {
        self.submit(query)?.wait()
    }

    /// Run independent queries in parallel; results keep the input order.
    pub fn run_batch(&self, queries: &[OptimizationQuery]) -> Vec<OptimizationResult> {
        let log_rounds = self.log_rounds;
        self.pool.install(|| {
            queries
                .par_iter()
                .map(|query| {
                    if log_rounds {
                        CapitalOptimizer::maximize_observed(query, &mut LogObserver)
                    } else {
                        CapitalOptimizer::maximize_observed(query, &mut NoopObserver)
                    }
                })
                .collect()
        })
    }
}

fn run_job(query: &OptimizationQuery, log_rounds: bool, cancel: &CancellationFlag) -> Outcome {
    let outcome = if log_rounds {
        CapitalOptimizer::maximize_with(query, &mut LogObserver, Some(cancel))
    } else {
        CapitalOptimizer::maximize_with(query, &mut NoopObserver, Some(cancel))
    };
    match &outcome {
        Ok(result) => log::info!(
            "Capital maximization complete. Final capital: {}",
            result.final_capital()
        ),
        Err(e) => log::error!("Error during capital maximization: {}", e),
    }
    outcome
}

/// Handle to a run scheduled on an [`OptimizerPool`].
#[derive(Debug)]
pub struct PendingOptimization {
    receiver: Receiver<Outcome>,
    cancel: CancellationFlag,
}

impl PendingOptimization {
    /// Ask the run to stop before its next selection round.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_flag(&self) -> &CancellationFlag {
        &self.cancel
    }

    /// Block until the run reports its outcome.
    pub fn wait(self) -> Outcome {
        self.receiver.recv().map_err(|_| {
            OptimizerError::WorkerPool("worker exited without reporting a result".to_string())
        })?
    }

    /// Block for at most `timeout`. On expiry the run is cancelled and
    /// [`OptimizerError::TimedOut`] is returned.
    pub fn wait_timeout(self, timeout: Duration) -> Outcome {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                self.cancel.cancel();
                log::warn!("Capital maximization timed out after {:?}", timeout);
                Err(OptimizerError::TimedOut)
            }
            Err(RecvTimeoutError::Disconnected) => Err(OptimizerError::WorkerPool(
                "worker exited without reporting a result".to_string(),
            )),
        }
    }
}
