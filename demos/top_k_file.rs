use std::path::{Path, PathBuf};

use anyhow::Error;
use bounded_top_k::combine::Combine;
use bounded_top_k::datagen::write_random_dataset;
use bounded_top_k::memory_limit::MemoryCeiling;
use bounded_top_k::strategy::Strategy;
use bounded_top_k::top_k::TopK;
use simple_logger::SimpleLogger;

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

const MEMORY_CEILING: u64 = 256 * 1024 * 1024;
const CHUNK_CAPACITY_MB: u64 = 20;
const ELEMENTS: usize = 125 * 1024 * 1024;

fn heap_scan(input_path: &Path) -> Result<Vec<i32>, Error> {
    let mut top_k = TopK::new(100);
    top_k.with_chunk_capacity_mb(CHUNK_CAPACITY_MB);
    top_k.scan_file(input_path)
}

fn sequential_select(input_path: &Path) -> Result<Vec<i32>, Error> {
    // partition strategy and sequential combination are the defaults
    let mut top_k = TopK::new(100);
    top_k.with_chunk_capacity_mb(CHUNK_CAPACITY_MB);
    top_k.with_memory_ceiling(MEMORY_CEILING);
    top_k.top_k_file(input_path)
}

fn parallel_select(input_path: &Path) -> Result<Vec<i32>, Error> {
    let mut top_k = TopK::new(100);
    top_k.with_chunk_capacity_mb(CHUNK_CAPACITY_MB);
    top_k.with_memory_ceiling(MEMORY_CEILING);
    top_k.with_strategy(Strategy::Partition);
    top_k.with_combine(Combine::Parallel);
    top_k.with_workers(num_cpus::get().min(8));
    top_k.top_k_file(input_path)
}

// cargo run -r --example top_k_file
pub fn main() -> Result<(), Error> {
    SimpleLogger::new().with_level(log::LevelFilter::Info).init()?;
    let input_path = PathBuf::from("./target/random-500mb.dat");
    if !input_path.exists() {
        write_random_dataset(&input_path, ELEMENTS, 1..=1000, 0)?;
    }

    let ceiling = MemoryCeiling::apply(MEMORY_CEILING)?;
    let scanned = heap_scan(&input_path)?;
    let sequential = sequential_select(&input_path)?;
    let parallel = parallel_select(&input_path)?;
    ceiling.restore()?;

    assert_eq!(scanned, sequential);
    assert_eq!(scanned, parallel);
    log::info!("Top 10 of 100: {:?}", &scanned[..10]);
    Ok(())
}
