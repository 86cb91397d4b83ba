use std::sync::{Condvar, Mutex, MutexGuard};

use crate::error::TopKError;
use crate::merge_scheduler::merge_task_count;
use crate::partial_result::PartialResult;

struct MergeState {
    // [0, allocated) were handed out to workers, [allocated, len) are free to claim
    results: Vec<Option<PartialResult>>,
    allocated: usize,
    finished: usize,
    total: usize,
    failure: Option<String>,
}

impl MergeState {
    fn pair_available(&self) -> bool {
        self.allocated + 2 <= self.results.len()
    }

    fn complete(&self) -> bool {
        self.finished == self.total
    }
}

/// Shared state of a pairwise reduction.
///
/// Workers call [MergeMonitor::claim_pair] to take ownership of the next two unclaimed
/// partial results and [MergeMonitor::submit] to append the merged one. All state
/// transitions happen under a single lock, waiting workers are woken through one condition
/// variable.
pub(crate) struct MergeMonitor {
    state: Mutex<MergeState>,
    ready: Condvar,
}

impl MergeMonitor {
    pub(crate) fn new(partials: Vec<PartialResult>) -> MergeMonitor {
        let total = merge_task_count(partials.len());
        MergeMonitor {
            state: Mutex::new(MergeState {
                results: partials.into_iter().map(Some).collect(),
                allocated: 0,
                finished: 0,
                total,
                failure: None,
            }),
            ready: Condvar::new(),
        }
    }

    /// Block until two partial results can be claimed.
    ///
    /// Returns `None` once every merge has finished or a worker has failed.
    pub(crate) fn claim_pair(&self) -> Result<Option<(PartialResult, PartialResult)>, TopKError> {
        let mut state = self.lock()?;
        loop {
            if state.failure.is_some() || state.complete() {
                return Ok(None);
            }
            if state.pair_available() {
                let first = state.allocated;
                state.allocated += 2;
                let a = state.results[first].take();
                let b = state.results[first + 1].take();
                return match (a, b) {
                    (Some(a), Some(b)) => Ok(Some((a, b))),
                    _ => Err(TopKError::WorkerFailure(format!("partial results at {} were claimed twice", first))),
                };
            }
            state = self.ready.wait(state).map_err(|_| Self::poisoned())?;
        }
    }

    /// Append a merged partial result and wake waiting workers if there is something new
    /// for them to do.
    pub(crate) fn submit(&self, result: PartialResult) -> Result<(), TopKError> {
        let mut state = self.lock()?;
        state.results.push(Some(result));
        state.finished += 1;
        if state.complete() || state.pair_available() {
            self.ready.notify_all();
        }
        Ok(())
    }

    /// Record a worker failure. The first failure wins, all waiting workers are released.
    pub(crate) fn fail(&self, message: String) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.failure.is_none() {
            state.failure = Some(message);
        }
        self.ready.notify_all();
    }

    /// Take the final partial result after all workers returned
    pub(crate) fn finish(&self) -> Result<PartialResult, TopKError> {
        let mut state = self.lock()?;
        if let Some(failure) = state.failure.take() {
            return Err(TopKError::WorkerFailure(failure));
        }
        if !state.complete() {
            return Err(TopKError::WorkerFailure(format!(
                "only {} of {} merges finished",
                state.finished, state.total
            )));
        }
        state
            .results
            .pop()
            .flatten()
            .ok_or_else(|| TopKError::WorkerFailure("no merged result".to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, MergeState>, TopKError> {
        self.state.lock().map_err(|_| Self::poisoned())
    }

    fn poisoned() -> TopKError {
        TopKError::WorkerFailure("merge state lock poisoned".to_string())
    }
}
