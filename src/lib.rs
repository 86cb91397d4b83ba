//! This crate selects the K largest integers of a dataset that is too large to fit in memory.
//!
//! The dataset is read sequentially in chunks of bounded size. Every chunk is reduced to its
//! local Top-K with an in-memory selector, randomized quickselect or a bounded min-heap, and
//! the partial results are combined into the global Top-K. The combination runs either once
//! on the calling thread or as a pairwise reduction on a pool of worker threads. At no point
//! is more than one chunk, or the union of all partial results, held in memory.
//!
//! A dataset is a flat file of 4 byte signed integers in native byte order.
//!
//! # Examples
//! ```
//! use std::path::PathBuf;
//! use bounded_top_k::combine::Combine;
//! use bounded_top_k::strategy::Strategy;
//! use bounded_top_k::top_k::TopK;
//!
//! fn largest(input: PathBuf) -> Result<Vec<i32>, anyhow::Error> {
//!     let mut top_k = TopK::new(100);
//!
//!     // read the input in chunks of 20 MiB. A chunk has to hold at least k elements and,
//!     // when a memory ceiling is declared, must not exceed it.
//!     top_k.with_chunk_capacity_mb(20);
//!     top_k.with_memory_ceiling(100 * 1024 * 1024);
//!
//!     // reduce chunks with quickselect and merge the chunk results on 8 threads
//!     top_k.with_strategy(Strategy::Partition);
//!     top_k.with_combine(Combine::Parallel);
//!     top_k.with_workers(8);
//!
//!     top_k.top_k_file(&input)
//! }
//! ```
//!
//! Errors are reported as [anyhow::Error] with a [TopKError](error::TopKError) root cause.

pub(crate) mod bounded_heap;
pub(crate) mod chunk_iterator;
pub(crate) mod chunk_reducer;
pub(crate) mod config;
pub(crate) mod merge_command;
pub(crate) mod merge_monitor;

pub mod codec;
pub mod combine;
pub mod datagen;
pub mod error;
pub mod memory_limit;
pub mod merge_scheduler;
pub mod partial_result;
pub mod selector;
pub mod source;
pub mod strategy;
pub mod top_k;
