use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Min-heap holding at most `capacity` elements, the largest seen so far.
#[derive(Debug)]
pub(crate) struct BoundedMinHeap {
    heap: BinaryHeap<Reverse<i32>>,
    capacity: usize,
}

impl BoundedMinHeap {
    pub(crate) fn new(capacity: usize) -> BoundedMinHeap {
        BoundedMinHeap {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn push(&mut self, value: i32) {
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(value));
        } else if let Some(mut min) = self.heap.peek_mut() {
            if value > min.0 {
                // replacing through PeekMut sifts down once instead of pop + push
                *min = Reverse(value);
            }
        }
    }

    pub(crate) fn extend(&mut self, values: &[i32]) {
        for value in values {
            self.push(*value);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drain the heap, largest first
    pub(crate) fn into_descending_vec(self) -> Vec<i32> {
        // into_sorted_vec orders Reverse ascending, that is values descending
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(value)| value)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::bounded_heap::BoundedMinHeap;

    #[test]
    fn test_keeps_largest() {
        let mut heap = BoundedMinHeap::new(3);
        heap.extend(&[5, 1, 9, 3, 7, 2, 8, 4, 6]);
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.into_descending_vec(), vec![9, 8, 7]);
    }

    #[test]
    fn test_under_capacity() {
        let mut heap = BoundedMinHeap::new(5);
        heap.extend(&[1, 2]);
        assert_eq!(heap.into_descending_vec(), vec![2, 1]);
    }

    #[test]
    fn test_duplicates_counted() {
        let mut heap = BoundedMinHeap::new(3);
        heap.extend(&[4, 4, 1, 4, 4, 2]);
        assert_eq!(heap.into_descending_vec(), vec![4, 4, 4]);
    }
}
