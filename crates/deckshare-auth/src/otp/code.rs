//! Passcode generation and shape checks.

use rand::Rng;

/// Number of digits in a passcode.
pub const CODE_LEN: usize = 6;

/// Generate a uniformly random zero-padded 6-digit code.
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}

/// Whether `code` consists of exactly [`CODE_LEN`] ASCII digits.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}
