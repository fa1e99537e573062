//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, Base64, constant-time compare)
//! - Injected time and randomness providers (`Clock`, `RandomSource`)

pub mod clock;
pub mod crypto;
pub mod random;
