use std::thread;

use crate::chunk_iterator::Chunk;
use crate::partial_result::PartialResult;
use crate::strategy::Strategy;

/// Reduces one chunk to its local Top-K. The chunk buffer is released before returning.
pub(crate) struct ChunkReducer {
    k: usize,
    strategy: Strategy,
}

impl ChunkReducer {
    pub(crate) fn new(k: usize, strategy: Strategy) -> ChunkReducer {
        ChunkReducer {
            k,
            strategy,
        }
    }

    pub(crate) fn reduce(&self, chunk: Chunk) -> PartialResult {
        let offset = chunk.offset();
        let len = chunk.len();
        let partial = PartialResult::select(chunk.into_values(), self.k, self.strategy);
        log::debug!(
            "Reduced chunk at offset {} from {} to {} elements, thread: {}",
            offset,
            len,
            partial.len(),
            thread::current().name().unwrap_or("unnamed")
        );
        partial
    }
}
