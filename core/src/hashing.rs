//! Hash utilities for row/column signature computation.

use std::hash::Hasher;
use xxhash_rust::xxh64::Xxh64;

pub(crate) const XXH64_SEED: u64 = 0;

/// Hash an ordered token sequence; length-prefixing keeps `["ab"]` and
/// `["a", "b"]` apart.
pub(crate) fn hash_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> u64 {
    let mut hasher = Xxh64::new(XXH64_SEED);
    let mut count = 0u64;
    for token in tokens {
        hasher.write_u64(token.len() as u64);
        hasher.write(token.as_bytes());
        count += 1;
    }
    hasher.write_u64(count);
    hasher.finish()
}
