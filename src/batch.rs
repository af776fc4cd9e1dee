/// Generates the fleet's serial numbers for one run: `SN-000001` through
/// `SN-<count>`, zero padded to six digits.
pub fn enumerate_serials(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("SN-{i:06}")).collect()
}

/// Splits the serial sequence into order-preserving batches of at most
/// `max_batch_size` items.
///
/// For N serials and batch size K this yields ceil(N/K) batches; every
/// batch except possibly the last holds exactly K serials, and
/// concatenating the batches in order reproduces the input exactly.
pub fn plan(serials: &[String], max_batch_size: usize) -> Vec<Vec<String>> {
    assert!(max_batch_size > 0, "batch size must be positive");
    serials
        .chunks(max_batch_size)
        .map(|chunk| chunk.to_vec())
        .collect()
}
