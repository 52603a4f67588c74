//! Order reference codes.
//!
//! A ref code is the public, shareable identifier of an order, distinct from
//! its internal id: a fixed prefix, six digits derived from the creation
//! timestamp, and a short random suffix. Global uniqueness is enforced by
//! the database; generation only has to make collisions rare enough that a
//! bounded retry always succeeds in practice.

use jiff::Timestamp;
use rand::{RngCore, rngs::OsRng};

/// Ref code prefix.
pub const REF_CODE_PREFIX: &str = "ORD";

/// Number of random suffix characters.
pub const REF_CODE_SUFFIX_LEN: usize = 4;

// 32 characters so a random byte maps uniformly via modulo; ambiguous
// glyphs (I, L, O, U) are excluded.
const SUFFIX_ALPHABET: &[u8; 32] = b"ABCDEFGHJKMNPQRSTVWXYZ0123456789";

/// Generate a fresh ref code such as `ORD-583201-K7KM`.
#[must_use]
pub fn generate_ref_code(now: Timestamp) -> String {
    let millis = now.as_millisecond().rem_euclid(1_000_000);

    format!("{REF_CODE_PREFIX}-{millis:06}-{}", random_suffix())
}

/// Whether a string has the shape of a ref code. Lookup by an arbitrary
/// string is still safe; this only lets callers reject garbage early.
#[must_use]
pub fn is_well_formed(code: &str) -> bool {
    let mut segments = code.splitn(3, '-');

    let Some(prefix) = segments.next() else {
        return false;
    };

    let Some(digits) = segments.next() else {
        return false;
    };

    let Some(suffix) = segments.next() else {
        return false;
    };

    prefix == REF_CODE_PREFIX
        && digits.len() == 6
        && digits.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == REF_CODE_SUFFIX_LEN
        && suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b))
}

fn random_suffix() -> String {
    let mut bytes = [0_u8; REF_CODE_SUFFIX_LEN];

    OsRng.fill_bytes(&mut bytes);

    bytes
        .iter()
        .map(|byte| SUFFIX_ALPHABET[(byte % 32) as usize] as char)
        .collect()
}
