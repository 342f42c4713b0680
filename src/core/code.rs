//! Random coupon code synthesis.
//!
//! Codes are drawn uniformly from the 62 ASCII letters and digits. No check is
//! made against existing codes; collisions are only as unlikely as `62^length`
//! makes them.

use rand::Rng;
use rand::distr::{Alphanumeric, SampleString};

/// Default length of the random part of a code.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Generates a random `[a-zA-Z0-9]` string of `length` characters using the thread RNG.
#[must_use]
pub fn generate_random_code(length: usize) -> String {
    generate_random_code_with(&mut rand::rng(), length)
}

/// Generates a random `[a-zA-Z0-9]` string of `length` characters from `rng`.
pub fn generate_random_code_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    Alphanumeric.sample_string(rng, length)
}

/// Builds a full coupon code: `prefix` followed by a random suffix.
#[must_use]
pub fn generate_coupon_code(prefix: &str, length: usize) -> String {
    let mut code = String::with_capacity(prefix.len() + length);
    code.push_str(prefix);
    code.push_str(&generate_random_code(length));
    code
}
