//! In-memory Top-K selection.
//!
//! Two selectors share one contract: given a buffer and `k >= 1` they return the `k`
//! largest elements of the buffer, or all of them when `k` is not smaller than the buffer
//! length. Duplicates are preserved and counted individually.
//!
//! * [select_by_partition] - randomized quickselect, expected O(N), reorders the buffer
//! * [select_by_heap] - bounded min-heap, O(N log k) time and O(k) memory, reads the buffer
//!
//! # Examples
//! ```
//! use bounded_top_k::selector::{select_by_heap, select_by_partition};
//!
//! let mut values = vec![5, 1, 9, 3, 7, 2, 8, 4, 6];
//! assert_eq!(select_by_heap(&values, 3), vec![9, 8, 7]);
//!
//! let mut top = select_by_partition(&mut values, 3);
//! top.sort_unstable_by(|a, b| b.cmp(a));
//! assert_eq!(top, vec![9, 8, 7]);
//! ```

use rand::Rng;

use crate::bounded_heap::BoundedMinHeap;
use crate::strategy::Strategy;

/// Select the `k` largest elements of `buffer` with a randomized quickselect.
///
/// The buffer is reordered in place. The returned elements are not sorted.
pub fn select_by_partition(buffer: &mut [i32], k: usize) -> Vec<i32> {
    select_by_partition_with_rng(buffer, k, &mut rand::thread_rng())
}

/// Same as [select_by_partition] with a caller supplied random number generator for pivot
/// selection.
pub fn select_by_partition_with_rng<R: Rng + ?Sized>(buffer: &mut [i32], k: usize, rng: &mut R) -> Vec<i32> {
    let k = partition_prefix(buffer, k, rng);
    buffer[..k].to_vec()
}

/// Select the `k` largest elements of `buffer` with a bounded min-heap.
///
/// The buffer is not modified. The returned elements are sorted descending.
pub fn select_by_heap(buffer: &[i32], k: usize) -> Vec<i32> {
    let mut heap = BoundedMinHeap::new(k);
    heap.extend(buffer);
    heap.into_descending_vec()
}

/// Select the `k` largest elements of `values` and return them sorted descending.
pub fn top_k(values: &[i32], k: usize, strategy: Strategy) -> Vec<i32> {
    let mut result = strategy.select(values.to_vec(), k);
    sort_descending(&mut result);
    result
}

pub(crate) fn sort_descending(values: &mut [i32]) {
    values.sort_unstable_by(|a, b| b.cmp(a));
}

/// Move the `k` largest elements of `buffer` to its front and return how many leading
/// elements hold the selection, `min(k, buffer.len())`.
pub(crate) fn partition_prefix<R: Rng + ?Sized>(buffer: &mut [i32], k: usize, rng: &mut R) -> usize {
    if k >= buffer.len() {
        return buffer.len();
    }
    if k == 0 {
        return 0;
    }

    // active range is [start, end), always start < k <= end
    let mut start = 0;
    let mut end = buffer.len();
    loop {
        let (greater_end, equal_end) = partition(buffer, start, end, rng);
        if k < greater_end {
            end = greater_end;
        } else if k <= equal_end {
            break;
        } else {
            start = equal_end;
        }
    }
    k
}

/// Three way partition of `buffer[start..end]` around a uniformly random pivot.
///
/// On return `buffer[start..greater_end]` is greater than the pivot,
/// `buffer[greater_end..equal_end]` equals it and `buffer[equal_end..end]` is smaller.
/// The equal block is never empty, so every call shrinks the active range.
fn partition<R: Rng + ?Sized>(buffer: &mut [i32], start: usize, end: usize, rng: &mut R) -> (usize, usize) {
    let pivot = buffer[rng.gen_range(start..end)];
    let mut greater_end = start;
    let mut current = start;
    let mut smaller_start = end;
    while current < smaller_start {
        if buffer[current] > pivot {
            buffer.swap(greater_end, current);
            greater_end += 1;
            current += 1;
        } else if buffer[current] < pivot {
            smaller_start -= 1;
            buffer.swap(current, smaller_start);
        } else {
            current += 1;
        }
    }
    (greater_end, smaller_start)
}
