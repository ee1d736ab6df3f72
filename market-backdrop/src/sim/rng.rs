//! Seeded linear-congruential generator
//!
//! Identical seed strings always yield identical sequences, so the backdrop
//! renders the same synthetic market every time it is mounted with the same
//! seed. There is deliberately no external entropy source.

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// Deterministic pseudo-random stream derived from a string key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    seed: u64,
}

impl SeededRng {
    pub fn new(seed_key: &str) -> Self {
        Self {
            seed: u64::from(hash_key(seed_key)),
        }
    }

    /// Next value in `[0, 1)`
    pub fn next(&mut self) -> f64 {
        self.seed = (self.seed * MULTIPLIER + INCREMENT) % MODULUS;
        self.seed as f64 / MODULUS as f64
    }

    /// Uniform value in `[min, max)`
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// `center` plus or minus up to `variance`
    pub fn jitter(&mut self, center: f64, variance: f64) -> f64 {
        center + (self.next() - 0.5) * variance * 2.0
    }

    /// Fair coin with probability `p` of returning true
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }
}

/// 31-multiplier string hash over UTF-16 code units, wrapped to 32 bits
fn hash_key(key: &str) -> u32 {
    key.encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}
