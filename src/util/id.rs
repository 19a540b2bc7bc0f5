//! ID generation for locally stored issues and accounts.
//!
//! Format: `<prefix>-<hash>` where hash is base36 lowercase (0-9, a-z)
//! with adaptive length based on how many rows already exist.

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Extra nonces tried at the widest hash before giving up.
const MAX_WIDE_NONCES: u32 = 1_000;

/// Default ID generation configuration.
#[derive(Debug, Clone)]
pub struct IdConfig {
    /// ID prefix (e.g., "it", "usr").
    pub prefix: String,
    /// Minimum hash length.
    pub min_hash_length: usize,
    /// Maximum hash length.
    pub max_hash_length: usize,
    /// Maximum collision probability before increasing length.
    pub max_collision_prob: f64,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            prefix: "it".to_string(),
            min_hash_length: 4,
            max_hash_length: 10,
            max_collision_prob: 0.25,
        }
    }
}

impl IdConfig {
    /// Create a new ID config with the given prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }
}

/// ID generator that produces unique IDs.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    config: IdConfig,
}

impl IdGenerator {
    #[must_use]
    pub const fn new(config: IdConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(IdConfig::default())
    }

    /// Compute the optimal hash length for a given row count.
    ///
    /// Uses birthday problem approximation to estimate collision probability.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap
    )]
    pub fn optimal_length(&self, count: usize) -> usize {
        let n = count as f64;
        let max_prob = self.config.max_collision_prob;

        for len in self.config.min_hash_length..=self.config.max_hash_length {
            let space = 36_f64.powi(len as i32);
            // P(collision) ≈ 1 - e^(-n²/2d)
            let prob = 1.0 - (-n * n / (2.0 * space)).exp();
            if prob < max_prob {
                return len;
            }
        }
        self.config.max_hash_length
    }

    /// Generate a candidate ID with the given parameters.
    #[must_use]
    pub fn generate_candidate(
        &self,
        seed_text: &str,
        owner: &str,
        created_at: DateTime<Utc>,
        nonce: u32,
        hash_length: usize,
    ) -> String {
        let seed = generate_id_seed(seed_text, owner, created_at, nonce);
        format!("{}-{}", self.config.prefix, compute_id_hash(&seed, hash_length))
    }

    /// Generate an ID, checking for collisions with the provided checker.
    ///
    /// The checker returns `Ok(true)` if the ID is already taken.
    ///
    /// # Errors
    ///
    /// Propagates the checker's error, or returns `StoreError::IdExhausted`
    /// when every candidate is taken.
    pub fn generate<F>(
        &self,
        seed_text: &str,
        owner: &str,
        created_at: DateTime<Utc>,
        count: usize,
        exists: F,
    ) -> StoreResult<String>
    where
        F: Fn(&str) -> StoreResult<bool>,
    {
        let start = self.optimal_length(count);

        for length in start..=self.config.max_hash_length.max(start) {
            for nonce in 0..10 {
                let id = self.generate_candidate(seed_text, owner, created_at, nonce, length);
                if !exists(&id)? {
                    return Ok(id);
                }
            }
        }

        // Every length collided: widen the hash and walk more nonces.
        for nonce in 10..10 + MAX_WIDE_NONCES {
            let id = self.generate_candidate(seed_text, owner, created_at, nonce, 13);
            if !exists(&id)? {
                return Ok(id);
            }
        }

        Err(StoreError::IdExhausted {
            prefix: self.config.prefix.clone(),
        })
    }
}

/// Seed string: `seed_text | owner | created_at (ns) | nonce`.
#[must_use]
pub fn generate_id_seed(seed_text: &str, owner: &str, created_at: DateTime<Utc>, nonce: u32) -> String {
    format!(
        "{}|{}|{}|{}",
        seed_text,
        owner,
        created_at.timestamp_nanos_opt().unwrap_or(0),
        nonce
    )
}

/// Compute a base36 hash of the input string with a specific length.
///
/// SHA256 of the input, first 8 bytes read as a big-endian u64, base36
/// encoded, left-padded with '0' and truncated to `length`.
#[must_use]
pub fn compute_id_hash(input: &str, length: usize) -> String {
    let digest = Sha256::digest(input.as_bytes());

    let mut num = 0u64;
    for &byte in digest.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let encoded = base36_encode(num);
    let padded = if encoded.len() < length {
        format!("{encoded:0>length$}")
    } else {
        encoded
    };
    padded.chars().take(length).collect()
}

#[allow(clippy::cast_possible_truncation)]
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

/// Normalize user input for an ID.
///
/// Local ids (`it-` in any case) are lowercased to match the base36 hash.
/// Anything else is a store-assigned id and is only trimmed.
#[must_use]
pub fn normalize_id(id: &str) -> String {
    let trimmed = id.trim();
    let local = trimmed
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("it-"));
    if local {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}
