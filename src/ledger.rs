use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::HashError;
use crate::model::ledger::LedgerEntry;

type HmacSha256 = Hmac<Sha256>;

/// Keyed digest over the immutable fields of an attendance closure.
///
/// Each field is length-prefixed (big-endian u32, then the bytes) before
/// feeding the MAC, so no split of the concatenated input can collide with
/// another. Instants are rendered as Unix-epoch milliseconds.
pub fn compute_hash(
    salt: &str,
    shift_id: u64,
    worker_id: u64,
    clock_in_at: DateTime<Utc>,
    clock_out_at: DateTime<Utc>,
) -> Result<String, HashError> {
    if salt.is_empty() {
        return Err(HashError::EmptySalt);
    }

    let mut mac =
        HmacSha256::new_from_slice(salt.as_bytes()).map_err(|_| HashError::InvalidKey)?;

    for field in [
        shift_id.to_string(),
        worker_id.to_string(),
        clock_in_at.timestamp_millis().to_string(),
        clock_out_at.timestamp_millis().to_string(),
    ] {
        mac.update(&(field.len() as u32).to_be_bytes());
        mac.update(field.as_bytes());
    }

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Recomputes the digest for a committed entry and compares it with the
/// stored one. Auditor-facing; never called on the write path.
pub fn verify_entry(entry: &LedgerEntry, salt: &str) -> Result<bool, HashError> {
    let expected = compute_hash(
        salt,
        entry.shift_id,
        entry.worker_id,
        entry.clock_in_at,
        entry.clock_out_at,
    )?;
    Ok(expected == entry.hash)
}
