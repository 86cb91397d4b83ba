use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use bounded_top_k::codec::encode_i32s;
use data_encoding::HEXLOWER;
use rayon::slice::ParallelSliceMut;

#[allow(dead_code)]
pub fn setup() {
    let results_dir_path = PathBuf::from_str("./target/results/").unwrap();

    if !results_dir_path.exists() {
        fs::create_dir_all(&results_dir_path).unwrap_or_else(|_|
            panic!("Failed to create results directory: {:?}", results_dir_path)
        );
    }
}

#[allow(dead_code)]
pub fn temp_file_name(dir: &str) -> PathBuf {
    let mut result = PathBuf::from(dir);
    let name = HEXLOWER.encode(&rand::random::<[u8; 16]>());
    result.push(name);
    result
}

#[allow(dead_code)]
pub fn write_dataset(path: &PathBuf, values: &[i32]) -> Result<(), anyhow::Error> {
    let mut bytes = Vec::new();
    encode_i32s(values, &mut bytes);
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Ground truth by a full parallel sort
#[allow(dead_code)]
pub fn expected_top_k(values: &[i32], k: usize) -> Vec<i32> {
    let mut sorted = values.to_vec();
    sorted.par_sort_unstable_by(|a, b| b.cmp(a));
    sorted.truncate(k);
    sorted
}
