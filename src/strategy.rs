use crate::selector::{partition_prefix, select_by_heap};

/// Selection algorithm used to reduce chunks and merge partial results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Randomized quickselect, expected linear time
    #[default]
    Partition,
    /// Bounded min-heap, O(N log k), preferable when k is small relative to the chunk
    Heap,
}

impl Strategy {
    /// Select the `k` largest elements of an owned buffer. The order of the result is
    /// unspecified.
    pub fn select(&self, mut buffer: Vec<i32>, k: usize) -> Vec<i32> {
        match self {
            Strategy::Partition => {
                let selected = partition_prefix(&mut buffer, k, &mut rand::thread_rng());
                buffer.truncate(selected);
                buffer.shrink_to_fit();
                buffer
            }
            Strategy::Heap => select_by_heap(&buffer, k),
        }
    }
}
