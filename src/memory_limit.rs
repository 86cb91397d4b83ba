//! Process address space limit for running a query under a hard memory ceiling.
//!
//! The engine itself never enforces the ceiling, binaries and benchmarks apply it around a
//! query and restore the previous limit afterwards.

use anyhow::Context;
use rlimit::{getrlimit, setrlimit, Resource};

/// An applied `RLIMIT_AS` soft limit. [MemoryCeiling::restore] puts back the limits that
/// were in place before [MemoryCeiling::apply].
#[derive(Debug)]
pub struct MemoryCeiling {
    bytes: u64,
    previous_soft: u64,
    previous_hard: u64,
}

impl MemoryCeiling {
    /// Lower the address space soft limit to `bytes`, capped by the current hard limit
    pub fn apply(bytes: u64) -> Result<MemoryCeiling, anyhow::Error> {
        let (previous_soft, previous_hard) = getrlimit(Resource::AS).with_context(|| "getrlimit AS")?;
        log::info!("Current rlimit AS, soft: {}, hard: {}", previous_soft, previous_hard);
        let soft = bytes.min(previous_hard);
        log::info!("Set new rlimit AS, soft: {}, hard: {}", soft, previous_hard);
        setrlimit(Resource::AS, soft, previous_hard)
            .with_context(|| format!("set rlimit AS, soft: {}, hard: {}", soft, previous_hard))?;
        Ok(MemoryCeiling {
            bytes: soft,
            previous_soft,
            previous_hard,
        })
    }

    /// The soft limit that was applied
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn restore(self) -> Result<(), anyhow::Error> {
        log::info!("Restore rlimit AS, soft: {}, hard: {}", self.previous_soft, self.previous_hard);
        setrlimit(Resource::AS, self.previous_soft, self.previous_hard)
            .with_context(|| format!("set rlimit AS, soft: {}, hard: {}", self.previous_soft, self.previous_hard))?;
        Ok(())
    }
}
