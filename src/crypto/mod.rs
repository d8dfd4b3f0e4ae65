//! Cryptographic helpers for LifeLedger
//!
//! Argon2id hashing for the passcode and memorable word, and a string type
//! that wipes its buffer on drop.

pub mod hashing;
pub mod secure_memory;

pub use hashing::{hash_secret, verify_secret, HashParams};
pub use secure_memory::SecureString;
