use std::sync::Arc;

use anyhow::anyhow;
use command_executor::shutdown_mode::ShutdownMode;
use command_executor::thread_pool_builder::ThreadPoolBuilder;

use crate::error::TopKError;
use crate::merge_command::{MergeCommand, MergeFn};
use crate::merge_monitor::MergeMonitor;
use crate::partial_result::PartialResult;
use crate::strategy::Strategy;

/// Number of pairwise merges needed to reduce `count` partial results to one.
///
/// Every level of the binary reduction merges `len / 2` pairs and carries an odd leftover to
/// the next level.
///
/// # Examples
/// ```
/// use bounded_top_k::merge_scheduler::merge_task_count;
/// assert_eq!(merge_task_count(0), 0);
/// assert_eq!(merge_task_count(1), 0);
/// assert_eq!(merge_task_count(5), 4);
/// ```
pub fn merge_task_count(count: usize) -> usize {
    let mut tasks = 0;
    let mut length = count;
    while length > 1 {
        tasks += length / 2;
        length = length / 2 + length % 2;
    }
    tasks
}

/// Reduce partial results to a single one by merging pairs on a fixed pool of worker threads.
///
/// Each merge only holds two partial results of at most `k` elements, the memory bound of the
/// sequential combination is preserved.
///
/// # Examples
/// ```
/// use bounded_top_k::merge_scheduler::ParallelMergeScheduler;
/// use bounded_top_k::partial_result::PartialResult;
/// use bounded_top_k::strategy::Strategy;
///
/// fn merge() -> Result<(), anyhow::Error> {
///     let partials = vec![
///         PartialResult::new(vec![9, 5]),
///         PartialResult::new(vec![8, 6]),
///         PartialResult::new(vec![7, 1]),
///     ];
///     let scheduler = ParallelMergeScheduler::new(2, 4, Strategy::Partition);
///     assert_eq!(scheduler.merge(partials)?.values(), &[9, 8]);
///     Ok(())
/// }
/// # merge().unwrap();
/// ```
pub struct ParallelMergeScheduler {
    k: usize,
    workers: usize,
    strategy: Strategy,
}

impl ParallelMergeScheduler {
    pub fn new(k: usize, workers: usize, strategy: Strategy) -> ParallelMergeScheduler {
        ParallelMergeScheduler {
            k,
            workers,
            strategy,
        }
    }

    /// Merge all `partials` into the Top-K of their union.
    ///
    /// No pool is created for fewer than two partial results. A failing or panicking merge
    /// fails the whole reduction.
    pub fn merge(&self, partials: Vec<PartialResult>) -> Result<PartialResult, anyhow::Error> {
        let k = self.k;
        let strategy = self.strategy;
        self.merge_with(partials, Arc::new(move |a: PartialResult, b: PartialResult| Ok::<PartialResult, anyhow::Error>(a.merge(b, k, strategy))))
    }

    pub(crate) fn merge_with(&self, mut partials: Vec<PartialResult>, merge: MergeFn) -> Result<PartialResult, anyhow::Error> {
        if self.k == 0 {
            return Err(TopKError::invalid_configuration("k must be at least 1").into());
        }
        if self.workers == 0 {
            return Err(TopKError::invalid_configuration("at least one worker is required").into());
        }
        if partials.len() <= 1 {
            return Ok(partials.pop().unwrap_or_default());
        }

        let total = merge_task_count(partials.len());
        log::info!("Start merging {} partial results in {} merges, workers: {}", partials.len(), total, self.workers);
        let cores = num_cpus::get();
        if self.workers > cores {
            log::warn!("{} merge workers exceed {} available cores, the work will be split among available cores", self.workers, cores);
        }

        let monitor = Arc::new(MergeMonitor::new(partials));
        let mut thread_pool_builder = ThreadPoolBuilder::new();
        let mut merging_pool = thread_pool_builder
            .with_name("merging".to_string())
            .with_tasks(self.workers)
            .with_queue_size(self.workers)
            .with_shutdown_mode(ShutdownMode::CompletePending)
            .build()
            .map_err(|e| anyhow!("Failed to create merging pool: {}", e))?;

        for _ in 0..self.workers {
            merging_pool.submit(Box::new(MergeCommand::new(monitor.clone(), merge.clone())));
        }

        log::info!("Shutting down merging pool");
        merging_pool.shutdown();
        merging_pool.join()?;

        let result = monitor.finish()?;
        log::info!("Finish merging, result length: {}", result.len());
        Ok(result)
    }
}
