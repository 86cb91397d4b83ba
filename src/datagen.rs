use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{anyhow, Context};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::codec::encode_i32s;

const BATCH: usize = 64 * 1024;

/// Write a dataset file of `elements` integers drawn uniformly from `range`.
///
/// The same `seed` always produces the same file.
///
/// # Examples
/// ```
/// use bounded_top_k::datagen::write_random_dataset;
///
/// fn dataset(dir: &std::path::Path) -> Result<(), anyhow::Error> {
///     let path = dir.join("dataset.bin");
///     write_random_dataset(&path, 1_000, 1..=1000, 7)?;
///     assert_eq!(path.metadata()?.len(), 4_000);
///     Ok(())
/// }
/// # dataset(&std::env::temp_dir()).unwrap();
/// ```
pub fn write_random_dataset(path: &Path, elements: usize, range: RangeInclusive<i32>, seed: u64) -> Result<(), anyhow::Error> {
    let file = File::create(path).with_context(|| anyhow!("path: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(BATCH.min(elements));
    let mut bytes = Vec::new();
    let mut remaining = elements;
    while remaining > 0 {
        let batch = remaining.min(BATCH);
        values.clear();
        values.extend((0..batch).map(|_| rng.gen_range(range.clone())));
        bytes.clear();
        encode_i32s(&values, &mut bytes);
        writer.write_all(&bytes)
            .with_context(|| anyhow!("path: {}", path.display()))?;
        remaining -= batch;
    }
    writer.flush().with_context(|| anyhow!("path: {}", path.display()))?;
    log::info!("Wrote {} random elements to {}", elements, path.display());
    Ok(())
}
