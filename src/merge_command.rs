use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use command_executor::command::Command;

use crate::error::TopKError;
use crate::merge_monitor::MergeMonitor;
use crate::partial_result::PartialResult;

pub(crate) type MergeFn = Arc<dyn Fn(PartialResult, PartialResult) -> Result<PartialResult, anyhow::Error> + Send + Sync>;

/// Worker loop of the pairwise reduction: claim a pair, merge it outside the lock, submit
/// the result, until the monitor reports there is nothing left.
pub(crate) struct MergeCommand {
    monitor: Arc<MergeMonitor>,
    merge: MergeFn,
}

impl MergeCommand {
    pub(crate) fn new(monitor: Arc<MergeMonitor>, merge: MergeFn) -> MergeCommand {
        MergeCommand {
            monitor,
            merge,
        }
    }

    fn run(&self) -> Result<usize, anyhow::Error> {
        let mut merges = 0;
        while let Some((a, b)) = self.monitor.claim_pair()? {
            let merged = match panic::catch_unwind(AssertUnwindSafe(|| (self.merge)(a, b))) {
                Ok(merged) => merged?,
                Err(payload) => return Err(TopKError::WorkerFailure(panic_message(payload.as_ref())).into()),
            };
            self.monitor.submit(merged)?;
            merges += 1;
        }
        Ok(merges)
    }
}

impl Command for MergeCommand {
    fn execute(&self) -> Result<(), anyhow::Error> {
        let name = thread::current().name().unwrap_or("unnamed").to_string();
        match self.run() {
            Ok(merges) => {
                log::debug!("Merge worker done after {} merges, thread: {}", merges, name);
            }
            Err(e) => {
                // the monitor carries the failure back to the caller
                log::error!("Merge worker failed, thread: {}, error: {:#}", name, e);
                self.monitor.fail(format!("{:#}", e));
            }
        }
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}
