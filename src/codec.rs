//! Fixed width integer encoding used by dataset files.
//!
//! A dataset is a flat sequence of 4 byte signed integers in native byte order, without any
//! header. The functions below decode and encode byte groups explicitly instead of
//! reinterpreting memory.

/// Size in bytes of a single encoded element
pub const ELEMENT_SIZE: usize = std::mem::size_of::<i32>();

/// Decode every complete 4 byte group of `bytes` and append the values to `values`.
///
/// Returns the number of trailing bytes that did not form a complete element.
pub fn decode_i32s(bytes: &[u8], values: &mut Vec<i32>) -> usize {
    let groups = bytes.chunks_exact(ELEMENT_SIZE);
    let remainder = groups.remainder().len();
    values.reserve(bytes.len() / ELEMENT_SIZE);
    for group in groups {
        let mut raw = [0u8; ELEMENT_SIZE];
        raw.copy_from_slice(group);
        values.push(i32::from_ne_bytes(raw));
    }
    remainder
}

/// Encode `values` and append the bytes to `bytes`
pub fn encode_i32s(values: &[i32], bytes: &mut Vec<u8>) {
    bytes.reserve(values.len() * ELEMENT_SIZE);
    for value in values {
        bytes.extend_from_slice(&value.to_ne_bytes());
    }
}
