//! Randomness Provider
//!
//! Challenge material comes from an injected [`RandomSource`] so ceremony
//! tests can observe or fix the generated bytes.

use rand::{RngCore, rngs::OsRng};
use std::sync::Mutex;

/// Injected source of cryptographic randomness
pub trait RandomSource: Send + Sync {
    /// Fill `buf` with random bytes
    fn fill(&self, buf: &mut [u8]);

    /// Generate `len` random bytes
    fn bytes(&self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf);
        buf
    }
}

/// OS-backed randomness used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomSource;

impl RandomSource for OsRandomSource {
    fn fill(&self, buf: &mut [u8]) {
        OsRng.fill_bytes(buf);
    }
}

/// Deterministic source for tests: repeats a fixed pattern
#[derive(Debug)]
pub struct FixedRandomSource {
    pattern: Mutex<Vec<u8>>,
}

impl FixedRandomSource {
    pub fn new(pattern: Vec<u8>) -> Self {
        assert!(!pattern.is_empty(), "pattern must not be empty");
        Self {
            pattern: Mutex::new(pattern),
        }
    }
}

impl RandomSource for FixedRandomSource {
    fn fill(&self, buf: &mut [u8]) {
        let pattern = self.pattern.lock().expect("random lock poisoned");
        for (i, b) in buf.iter_mut().enumerate() {
            *b = pattern[i % pattern.len()];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_random_not_all_zeros() {
        let source = OsRandomSource;
        let bytes = source.bytes(32);
        assert_eq!(bytes.len(), 32);
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_fixed_random_repeats_pattern() {
        let source = FixedRandomSource::new(vec![0xAA, 0xBB]);
        let bytes = source.bytes(5);
        assert_eq!(bytes, vec![0xAA, 0xBB, 0xAA, 0xBB, 0xAA]);
    }
}
