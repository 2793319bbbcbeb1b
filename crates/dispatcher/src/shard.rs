//! Shard resolver - deterministic partition-key to shard mapping

use contracts::ContractError;

/// Width of the trailing key segment used as the shard digest
const DIGEST_WIDTH: usize = 5;

/// Map a partition key to a shard in `[0, shard_count)`.
///
/// The digest is the trailing 5 alphanumeric characters of the key (shorter
/// keys use their full length), read as a base-36 integer and reduced modulo
/// `shard_count`. Stable across restarts and platforms; no randomness, no
/// locale dependence. A key without any alphanumeric characters resolves to
/// shard 0.
///
/// # Errors
/// Rejects `shard_count == 0`.
pub fn shard_for_key(partition_key: &str, shard_count: u32) -> Result<u32, ContractError> {
    if shard_count == 0 {
        return Err(ContractError::InvalidShardCount { got: shard_count });
    }

    let digest: String = partition_key
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let tail = &digest[digest.len().saturating_sub(DIGEST_WIDTH)..];

    if tail.is_empty() {
        return Ok(0);
    }

    // 5 base-36 digits fit comfortably in u64
    let value = u64::from_str_radix(tail, 36)
        .map_err(|e| ContractError::Other(format!("unparsable shard digest '{tail}': {e}")))?;
    Ok((value % u64::from(shard_count)) as u32)
}
