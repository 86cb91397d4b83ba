use std::io::Read;
use std::path::Path;

use crate::bounded_heap::BoundedMinHeap;
use crate::chunk_iterator::ChunkIterator;
use crate::chunk_reducer::ChunkReducer;
use crate::combine::Combine;
use crate::config::Config;
use crate::error::TopKError;
use crate::merge_scheduler::ParallelMergeScheduler;
use crate::partial_result::PartialResult;
use crate::source::open_source;
use crate::strategy::Strategy;

const DEFAULT_CHUNK_CAPACITY_BYTES: u64 = 20 * 1024 * 1024;
const DEFAULT_WORKERS: usize = 8;

/// Select the K largest integers of a dataset read in bounded chunks
///
/// # Examples
/// ```
/// use std::path::Path;
/// use bounded_top_k::combine::Combine;
/// use bounded_top_k::top_k::TopK;
///
/// // parallel merge of the chunk results
/// fn largest_100(input: &Path) -> Result<Vec<i32>, anyhow::Error> {
///     let mut top_k = TopK::new(100);
///     // every chunk buffer holds at most 20 MB of integers
///     top_k.with_chunk_capacity_mb(20);
///     // merge the partial results of all chunks on 8 threads
///     top_k.with_combine(Combine::Parallel);
///     top_k.with_workers(8);
///     top_k.top_k_file(input)
/// }
/// ```
pub struct TopK {
    k: usize,
    chunk_capacity_bytes: u64,
    workers: usize,
    strategy: Strategy,
    combine: Combine,
    memory_ceiling: Option<u64>,
}

impl TopK {
    /// Create a default TopK query for the `k` largest elements.
    ///
    /// * input is read in chunks of 20 MiB
    /// * chunks are reduced with [Strategy::Partition]
    /// * partial results are combined with [Combine::Sequential]
    /// * a parallel combination uses 8 workers
    /// * no memory ceiling is checked
    pub fn new(k: usize) -> TopK {
        TopK {
            k,
            chunk_capacity_bytes: DEFAULT_CHUNK_CAPACITY_BYTES,
            workers: DEFAULT_WORKERS,
            strategy: Strategy::Partition,
            combine: Combine::Sequential,
            memory_ceiling: None,
        }
    }

    /// The input will be read in chunks of at most `chunk_capacity_bytes`, rounded down to
    /// whole elements. A chunk must hold at least `k` elements.
    pub fn with_chunk_capacity_bytes(&mut self, chunk_capacity_bytes: u64) {
        self.chunk_capacity_bytes = chunk_capacity_bytes;
    }

    /// The input will be read in chunks of at most `chunk_capacity_mb` MiB
    pub fn with_chunk_capacity_mb(&mut self, chunk_capacity_mb: u64) {
        self.chunk_capacity_bytes = chunk_capacity_mb.saturating_mul(1024 * 1024);
    }

    /// Set the number of merge workers used by [Combine::Parallel]. The default is 8.
    pub fn with_workers(&mut self, workers: usize) {
        self.workers = workers;
    }

    /// Set the selection [Strategy]
    pub fn with_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    /// Set how chunk results are combined, see [Combine]
    pub fn with_combine(&mut self, combine: Combine) {
        self.combine = combine;
    }

    /// Declare the memory ceiling the query runs under. It is only checked against one chunk
    /// and its read buffer, enforcing it is left to the process, see
    /// [MemoryCeiling](crate::memory_limit::MemoryCeiling).
    pub fn with_memory_ceiling(&mut self, memory_ceiling: u64) {
        self.memory_ceiling = Some(memory_ceiling);
    }

    /// The K largest elements of a dataset file, descending
    pub fn top_k_file(&self, path: &Path) -> Result<Vec<i32>, anyhow::Error> {
        let config = self.create_config()?;
        log::info!("Start top {} of {}", config.k(), path.display());
        let result = Self::internal_top_k(open_source(path)?, &config)?;
        log::info!("Finish top {} of {}", config.k(), path.display());
        Ok(result)
    }

    /// The K largest elements of a sequential source, descending
    pub fn top_k_reader<R: Read>(&self, reader: R) -> Result<Vec<i32>, anyhow::Error> {
        let config = self.create_config()?;
        Self::internal_top_k(reader, &config)
    }

    /// Reduce every chunk of a source to its local Top-K without combining them
    pub fn partials_reader<R: Read>(&self, reader: R) -> Result<Vec<PartialResult>, anyhow::Error> {
        let config = self.create_config()?;
        Self::internal_partials(reader, &config)
    }

    /// The K largest elements of a dataset file computed with one bounded heap fed by all
    /// chunks, descending. Uses O(k) memory besides the chunk buffer.
    pub fn scan_file(&self, path: &Path) -> Result<Vec<i32>, anyhow::Error> {
        let config = self.create_config()?;
        log::info!("Start heap scan top {} of {}", config.k(), path.display());
        let result = Self::internal_scan(open_source(path)?, &config)?;
        log::info!("Finish heap scan top {} of {}", config.k(), path.display());
        Ok(result)
    }

    /// Same as [TopK::scan_file] for any sequential source
    pub fn scan_reader<R: Read>(&self, reader: R) -> Result<Vec<i32>, anyhow::Error> {
        let config = self.create_config()?;
        Self::internal_scan(reader, &config)
    }

    fn create_config(&self) -> Result<Config, TopKError> {
        let config = Config::new(
            self.k,
            self.chunk_capacity_bytes,
            self.workers,
            self.strategy,
            self.combine,
            self.memory_ceiling,
        );
        config.validate()?;
        Ok(config)
    }

    fn chunks<R: Read>(reader: R, config: &Config) -> Result<ChunkIterator<R>, TopKError> {
        let capacity = usize::try_from(config.chunk_capacity_bytes()).map_err(|_| {
            TopKError::invalid_configuration(format!(
                "chunk capacity of {} bytes is not addressable",
                config.chunk_capacity_bytes()
            ))
        })?;
        Ok(ChunkIterator::new(reader, capacity))
    }

    fn internal_partials<R: Read>(reader: R, config: &Config) -> Result<Vec<PartialResult>, anyhow::Error> {
        let reducer = ChunkReducer::new(config.k(), config.strategy());
        let mut partials = Vec::new();
        let mut elements: u64 = 0;
        for chunk in Self::chunks(reader, config)? {
            let chunk = chunk?;
            elements += chunk.len() as u64;
            partials.push(reducer.reduce(chunk));
        }
        log::info!("Reduced {} elements in {} chunks, strategy: {:?}", elements, partials.len(), config.strategy());
        Ok(partials)
    }

    fn internal_top_k<R: Read>(reader: R, config: &Config) -> Result<Vec<i32>, anyhow::Error> {
        if let Some(memory_ceiling) = config.memory_ceiling() {
            log::info!("Chunk capacity: {} bytes, memory ceiling: {} bytes", config.chunk_capacity_bytes(), memory_ceiling);
        }
        let partials = Self::internal_partials(reader, config)?;
        let result = match config.combine() {
            Combine::Sequential => Self::combine_sequential(partials, config),
            Combine::Parallel => {
                ParallelMergeScheduler::new(config.k(), config.workers(), config.strategy()).merge(partials)?
            }
        };
        Ok(result.into_vec())
    }

    // partials are released one by one while the first one's buffer grows
    fn combine_sequential(partials: Vec<PartialResult>, config: &Config) -> PartialResult {
        let total: usize = partials.iter().map(|partial| partial.len()).sum();
        log::info!("Combining {} partial results, {} elements", partials.len(), total);
        let mut partials = partials.into_iter();
        let mut values = match partials.next() {
            Some(first) => first.into_vec(),
            None => return PartialResult::default(),
        };
        values.reserve_exact(total - values.len());
        for partial in partials {
            values.extend_from_slice(&partial);
        }
        PartialResult::select(values, config.k(), config.strategy())
    }

    fn internal_scan<R: Read>(reader: R, config: &Config) -> Result<Vec<i32>, anyhow::Error> {
        let mut heap = BoundedMinHeap::new(config.k());
        let mut chunks = 0;
        for chunk in Self::chunks(reader, config)? {
            heap.extend(&chunk?.into_values());
            chunks += 1;
        }
        log::debug!("Scanned {} chunks, heap length: {}", chunks, heap.len());
        Ok(heap.into_descending_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, ErrorKind, Read};

    use crate::codec::encode_i32s;
    use crate::combine::Combine;
    use crate::config::Config;
    use crate::error::TopKError;
    use crate::partial_result::PartialResult;
    use crate::strategy::Strategy;
    use crate::top_k::TopK;

    fn encoded(values: &[i32]) -> Cursor<Vec<u8>> {
        let mut bytes = Vec::new();
        encode_i32s(values, &mut bytes);
        Cursor::new(bytes)
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.served {
                Err(std::io::Error::new(ErrorKind::Other, "bad sector"))
            } else {
                self.served = true;
                let bytes = 9i32.to_ne_bytes();
                buf[..4].copy_from_slice(&bytes);
                Ok(4)
            }
        }
    }

    #[test]
    fn test_concrete_scenario() -> Result<(), anyhow::Error> {
        let values = [5, 1, 9, 3, 7, 2, 8, 4, 6];
        for combine in [Combine::Sequential, Combine::Parallel] {
            for strategy in [Strategy::Partition, Strategy::Heap] {
                let mut top_k = TopK::new(3);
                top_k.with_chunk_capacity_bytes(12);
                top_k.with_combine(combine);
                top_k.with_strategy(strategy);
                assert_eq!(top_k.top_k_reader(encoded(&values))?, vec![9, 8, 7]);
            }
        }
        Ok(())
    }

    #[test]
    fn test_two_chunk_partials() -> Result<(), anyhow::Error> {
        let mut top_k = TopK::new(2);
        top_k.with_chunk_capacity_bytes(12);
        let partials = top_k.partials_reader(encoded(&[5, 9, 1, 8, 4, 6]))?;
        let partials: Vec<Vec<i32>> = partials.into_iter().map(|p| p.into_vec()).collect();
        assert_eq!(partials, vec![vec![9, 5], vec![8, 6]]);
        assert_eq!(top_k.top_k_reader(encoded(&[5, 9, 1, 8, 4, 6]))?, vec![9, 8]);
        Ok(())
    }

    #[test]
    fn test_k_exceeds_elements() -> Result<(), anyhow::Error> {
        let mut top_k = TopK::new(5);
        top_k.with_chunk_capacity_bytes(64);
        assert_eq!(top_k.top_k_reader(encoded(&[1, 2]))?, vec![2, 1]);
        assert_eq!(top_k.scan_reader(encoded(&[1, 2]))?, vec![2, 1]);
        Ok(())
    }

    #[test]
    fn test_empty_source() -> Result<(), anyhow::Error> {
        let mut top_k = TopK::new(5);
        top_k.with_combine(Combine::Parallel);
        assert!(top_k.top_k_reader(encoded(&[]))?.is_empty());
        assert!(top_k.scan_reader(encoded(&[]))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_scan_matches_partition() -> Result<(), anyhow::Error> {
        let values: Vec<i32> = (0..10_000).map(|i| (i * 7919) % 1013).collect();
        let mut top_k = TopK::new(50);
        top_k.with_chunk_capacity_bytes(4 * 333);
        let scanned = top_k.scan_reader(encoded(&values))?;
        let selected = top_k.top_k_reader(encoded(&values))?;
        assert_eq!(scanned, selected);
        assert_eq!(scanned.len(), 50);
        Ok(())
    }

    #[test]
    fn test_invalid_configuration() {
        let mut top_k = TopK::new(10);
        top_k.with_chunk_capacity_bytes(8);
        let error = top_k.top_k_reader(encoded(&[1])).expect_err("chunk smaller than k");
        assert!(matches!(error.downcast_ref::<TopKError>(), Some(TopKError::InvalidConfiguration(_))));

        let error = TopK::new(0).scan_reader(encoded(&[1])).expect_err("k of zero");
        assert!(matches!(error.downcast_ref::<TopKError>(), Some(TopKError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_combine_sequential_consumes_partials() -> Result<(), anyhow::Error> {
        let config = Config::new(3, 12, 1, Strategy::Partition, Combine::Sequential, None);
        let partials = vec![
            PartialResult::new(vec![5, 9, 1]),
            PartialResult::new(vec![]),
            PartialResult::new(vec![8, 4, 6]),
            PartialResult::new(vec![9, 2]),
        ];
        assert_eq!(TopK::combine_sequential(partials, &config).into_vec(), vec![9, 9, 8]);
        assert!(TopK::combine_sequential(Vec::new(), &config).is_empty());
        assert_eq!(TopK::combine_sequential(vec![PartialResult::new(vec![3, 7])], &config).into_vec(), vec![7, 3]);
        Ok(())
    }

    #[test]
    fn test_huge_chunk_capacity_mb() {
        let mut top_k = TopK::new(3);
        top_k.with_chunk_capacity_mb(u64::MAX);
        assert_eq!(top_k.chunk_capacity_bytes, u64::MAX);
        let error = top_k.top_k_reader(encoded(&[1, 2, 3])).expect_err("chunk can not be allocated");
        assert!(matches!(error.downcast_ref::<TopKError>(), Some(TopKError::InvalidConfiguration(_))));

        top_k.with_memory_ceiling(1 << 30);
        let error = top_k.scan_reader(encoded(&[1, 2, 3])).expect_err("chunk above ceiling");
        assert!(matches!(error.downcast_ref::<TopKError>(), Some(TopKError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_read_failure_aborts() {
        let mut top_k = TopK::new(1);
        top_k.with_chunk_capacity_bytes(4);
        let error = top_k.top_k_reader(FailingReader { served: false }).expect_err("read failure");
        match error.downcast_ref::<TopKError>() {
            Some(TopKError::IoFailure { offset, .. }) => assert_eq!(*offset, 4),
            other => panic!("expected io failure, got {:?}", other),
        }
    }
}
