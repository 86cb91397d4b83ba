use crate::chunk_iterator::STAGING_BYTES;
use crate::codec::ELEMENT_SIZE;
use crate::combine::Combine;
use crate::error::TopKError;
use crate::strategy::Strategy;

#[derive(Clone, Debug)]
pub(crate) struct Config {
    k: usize,
    chunk_capacity_bytes: u64,
    workers: usize,
    strategy: Strategy,
    combine: Combine,
    memory_ceiling: Option<u64>,
}

impl Config {
    pub(crate) fn new(
        k: usize,
        chunk_capacity_bytes: u64,
        workers: usize,
        strategy: Strategy,
        combine: Combine,
        memory_ceiling: Option<u64>,
    ) -> Config {
        Config {
            k,
            chunk_capacity_bytes,
            workers,
            strategy,
            combine,
            memory_ceiling,
        }
    }

    /// Reject parameters that can not produce a bounded, exact Top-K
    pub(crate) fn validate(&self) -> Result<(), TopKError> {
        if self.k == 0 {
            return Err(TopKError::invalid_configuration("k must be at least 1"));
        }
        if self.chunk_capacity_bytes < ELEMENT_SIZE as u64 {
            return Err(TopKError::invalid_configuration(format!(
                "chunk capacity of {} bytes can not hold a single element",
                self.chunk_capacity_bytes
            )));
        }
        if (self.chunk_capacity_elements() as u64) < self.k as u64 {
            return Err(TopKError::invalid_configuration(format!(
                "chunk capacity of {} elements is smaller than k = {}",
                self.chunk_capacity_elements(),
                self.k
            )));
        }
        if self.workers == 0 {
            return Err(TopKError::invalid_configuration("at least one worker is required"));
        }
        if let Some(memory_ceiling) = self.memory_ceiling {
            if memory_ceiling < self.chunk_footprint_bytes() {
                return Err(TopKError::invalid_configuration(format!(
                    "chunk of {} bytes with its read buffer needs {} bytes, above the memory ceiling of {} bytes",
                    self.chunk_capacity_bytes,
                    self.chunk_footprint_bytes(),
                    memory_ceiling
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn k(&self) -> usize {
        self.k
    }

    pub(crate) fn chunk_capacity_bytes(&self) -> u64 {
        self.chunk_capacity_bytes
    }

    /// Whole elements that fit in one chunk
    pub(crate) fn chunk_capacity_elements(&self) -> usize {
        usize::try_from(self.chunk_capacity_bytes / ELEMENT_SIZE as u64).unwrap_or(usize::MAX / ELEMENT_SIZE)
    }

    /// Bytes held while one chunk is read: the decoded chunk plus the staging buffer
    pub(crate) fn chunk_footprint_bytes(&self) -> u64 {
        let chunk = self.chunk_capacity_bytes - self.chunk_capacity_bytes % ELEMENT_SIZE as u64;
        chunk.saturating_add(chunk.min(STAGING_BYTES as u64))
    }

    pub(crate) fn workers(&self) -> usize {
        self.workers
    }

    pub(crate) fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub(crate) fn combine(&self) -> Combine {
        self.combine
    }

    pub(crate) fn memory_ceiling(&self) -> Option<u64> {
        self.memory_ceiling
    }
}
