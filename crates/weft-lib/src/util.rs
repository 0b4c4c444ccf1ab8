//! ID generation utilities.
//!
//! IDs are `<prefix>-<hash>` where hash is base36 lowercase with a length
//! adapted to the current issue count.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Generate a unique issue ID with the given prefix.
///
/// Uses SHA256 hashing with base36 encoding. The `exists` closure checks
/// for collisions against the live store.
pub fn generate_id<F>(
    prefix: &str,
    title: &str,
    created_at: DateTime<Utc>,
    issue_count: usize,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let mut length = optimal_hash_length(issue_count);

    loop {
        for nonce in 0..10 {
            let seed = generate_id_seed(title, created_at, nonce);
            let hash_str = compute_id_hash(&seed, length);
            let id = format!("{prefix}-{hash_str}");
            if !exists(&id) {
                return id;
            }
        }

        if length < 8 {
            length += 1;
        } else {
            // Fallback: longer hash with increasing nonces
            let mut nonce = 0u32;
            loop {
                let seed = generate_id_seed(title, created_at, nonce);
                let hash_str = compute_id_hash(&seed, 12);
                let id = format!("{prefix}-{hash_str}");
                if !exists(&id) {
                    return id;
                }
                nonce += 1;
                if nonce > 1000 {
                    return format!("{prefix}-{hash_str}{nonce}");
                }
            }
        }
    }
}

/// True when `id` looks like `<prefix>-<base36 hash>`.
#[must_use]
pub fn is_valid_id_format(id: &str) -> bool {
    let Some((prefix, hash)) = id.split_once('-') else {
        return false;
    };
    !prefix.is_empty()
        && prefix.len() <= 10
        && prefix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && !hash.is_empty()
        && hash.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Compute the optimal hash length for a given issue count.
///
/// Birthday problem approximation: keep P(collision) under 25%.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn optimal_hash_length(issue_count: usize) -> usize {
    let n = issue_count as f64;
    let max_prob = 0.25;

    for (len, exp) in [(3_usize, 3_i32), (4, 4), (5, 5), (6, 6), (7, 7), (8, 8)] {
        let space = 36_f64.powi(exp);
        let prob = 1.0 - (-n * n / (2.0 * space)).exp();
        if prob < max_prob {
            return len;
        }
    }
    8
}

fn generate_id_seed(title: &str, created_at: DateTime<Utc>, nonce: u32) -> String {
    format!(
        "{}|{}|{}",
        title,
        created_at.timestamp_nanos_opt().unwrap_or(0),
        nonce
    )
}

fn compute_id_hash(input: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();

    let mut num = 0u64;
    for &byte in result.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let mut encoded = base36_encode(num);
    if encoded.len() < length {
        encoded = format!("{encoded:0>length$}");
    }
    encoded.chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.into_iter().rev().collect()
}
