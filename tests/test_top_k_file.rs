use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use bounded_top_k::codec::decode_i32s;
use bounded_top_k::combine::Combine;
use bounded_top_k::datagen::write_random_dataset;
use bounded_top_k::strategy::Strategy;
use bounded_top_k::top_k::TopK;

mod common;

fn read_dataset(path: &PathBuf) -> Result<Vec<i32>, anyhow::Error> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    let mut values = Vec::new();
    decode_i32s(&bytes, &mut values);
    Ok(values)
}

#[test]
fn test_top_k_file() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    write_random_dataset(&input_path, 250_000, 1..=1000, 17)?;
    let expected = common::expected_top_k(&read_dataset(&input_path)?, 100);

    for strategy in [Strategy::Partition, Strategy::Heap] {
        for combine in [Combine::Sequential, Combine::Parallel] {
            let mut top_k = TopK::new(100);
            top_k.with_chunk_capacity_bytes(64 * 1024);
            top_k.with_strategy(strategy);
            top_k.with_combine(combine);
            top_k.with_workers(4);
            assert_eq!(top_k.top_k_file(&input_path)?, expected);
        }
    }

    let mut top_k = TopK::new(100);
    top_k.with_chunk_capacity_bytes(64 * 1024);
    assert_eq!(top_k.scan_file(&input_path)?, expected);

    fs::remove_file(input_path)?;
    Ok(())
}

#[test]
fn test_chunked_equivalence() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    write_random_dataset(&input_path, 30_011, i32::MIN..=i32::MAX, 5)?;
    let values = read_dataset(&input_path)?;

    for k in [1, 7, 64, 500] {
        let expected = common::expected_top_k(&values, k);
        // chunk capacities from exactly k elements to a single chunk holding everything,
        // including capacities that are not a whole number of elements
        for chunk_capacity_bytes in [4 * k as u64, 4 * k as u64 + 3, 10_000, 4 * 30_011, 1 << 20] {
            let mut top_k = TopK::new(k);
            top_k.with_chunk_capacity_bytes(chunk_capacity_bytes);
            assert_eq!(top_k.top_k_file(&input_path)?, expected, "k: {}, chunk: {}", k, chunk_capacity_bytes);
        }
    }

    fs::remove_file(input_path)?;
    Ok(())
}

#[test]
fn test_short_final_chunk() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    let values: Vec<i32> = (0..1001).map(|i| (i * 37) % 1001 - 500).collect();
    common::write_dataset(&input_path, &values)?;

    let mut top_k = TopK::new(10);
    top_k.with_chunk_capacity_bytes(4 * 100);
    let partials = top_k.partials_reader(File::open(&input_path)?)?;
    assert_eq!(partials.len(), 11);
    assert_eq!(partials[10].len(), 1);
    assert_eq!(top_k.top_k_file(&input_path)?, common::expected_top_k(&values, 10));

    fs::remove_file(input_path)?;
    Ok(())
}

#[test]
fn test_duplicates_preserved() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    let mut values = vec![3; 5000];
    values.extend_from_slice(&[9, 9, 9, 8]);
    common::write_dataset(&input_path, &values)?;

    let mut top_k = TopK::new(6);
    top_k.with_chunk_capacity_bytes(4 * 512);
    top_k.with_combine(Combine::Parallel);
    assert_eq!(top_k.top_k_file(&input_path)?, vec![9, 9, 9, 8, 3, 3]);

    fs::remove_file(input_path)?;
    Ok(())
}
