use std::io::{ErrorKind, Read};

use crate::codec::{decode_i32s, ELEMENT_SIZE};
use crate::error::TopKError;

#[derive(Debug)]
pub(crate) struct Chunk {
    offset: u64,
    values: Vec<i32>,
}

impl Chunk {
    pub(crate) fn new(offset: u64, values: Vec<i32>) -> Chunk {
        Chunk {
            offset,
            values,
        }
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn into_values(self) -> Vec<i32> {
        self.values
    }
}

/// Size of the staging buffer reads go through before decoding
pub(crate) const STAGING_BYTES: usize = 64 * 1024;

/// Staging buffer size used for a chunk capacity of `capacity_bytes`
pub(crate) fn staging_bytes(capacity_bytes: usize) -> usize {
    let capacity_bytes = capacity_bytes - capacity_bytes % ELEMENT_SIZE;
    capacity_bytes.min(STAGING_BYTES)
}

/// Split a sequential source into chunks of at most `capacity` bytes worth of elements.
///
/// Bytes are read through a small staging buffer and decoded straight into the chunk, so
/// a chunk is held in memory once. Only the last chunk may be shorter than the capacity.
/// A read error ends the iteration after yielding the error.
pub(crate) struct ChunkIterator<R: Read> {
    reader: R,
    staging: Vec<u8>,
    // bytes of an incomplete element at the front of `staging`
    pending: usize,
    capacity: usize,
    pos: u64,
    exhausted: bool,
}

impl<R: Read> ChunkIterator<R> {
    pub(crate) fn new(reader: R, capacity_bytes: usize) -> ChunkIterator<R> {
        let capacity = capacity_bytes / ELEMENT_SIZE;
        ChunkIterator {
            reader,
            staging: vec![0u8; staging_bytes(capacity_bytes)],
            pending: 0,
            capacity,
            pos: 0,
            exhausted: capacity == 0,
        }
    }

    /// One read into the staging buffer after the pending bytes, never past `limit`
    fn read_staging(&mut self, limit: usize) -> Result<usize, TopKError> {
        loop {
            match self.reader.read(&mut self.staging[self.pending..limit]) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(TopKError::IoFailure { offset: self.pos + self.pending as u64, source: e });
                }
            }
        }
    }

    /// Decode elements until the chunk is full or the source is exhausted
    fn fill(&mut self, values: &mut Vec<i32>) -> Result<(), TopKError> {
        while values.len() < self.capacity {
            let limit = self.staging.len().min((self.capacity - values.len()) * ELEMENT_SIZE);
            let n = self.read_staging(limit)?;
            if n == 0 {
                self.exhausted = true;
                if self.pending > 0 {
                    log::warn!("Ignoring {} trailing bytes at offset {}, not a whole element", self.pending, self.pos);
                }
                break;
            }
            if values.capacity() == 0 {
                values.try_reserve_exact(self.capacity).map_err(|e| {
                    TopKError::InvalidConfiguration(format!("chunk of {} elements can not be allocated: {}", self.capacity, e))
                })?;
            }
            let staged = self.pending + n;
            let remainder = decode_i32s(&self.staging[..staged], values);
            self.pos += (staged - remainder) as u64;
            self.staging.copy_within(staged - remainder..staged, 0);
            self.pending = remainder;
        }
        Ok(())
    }
}

impl<R: Read> Iterator for ChunkIterator<R> {
    type Item = Result<Chunk, TopKError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let offset = self.pos;
        let mut values = Vec::new();
        if let Err(e) = self.fill(&mut values) {
            self.exhausted = true;
            return Some(Err(e));
        }
        if values.is_empty() {
            return None;
        }
        Some(Ok(Chunk::new(offset, values)))
    }
}
