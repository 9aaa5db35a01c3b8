//! SHA-256 fingerprints of arguments and argument threads.
//!
//! An argument's fingerprint is the digest of its canonical form, so two
//! arguments share a fingerprint exactly when they compare equal. A thread
//! hash chains fingerprints along parent links:
//!
//!   thread_hash(root)  = H(ROOT_HASH   || fingerprint(root))
//!   thread_hash(child) = H(parent_hash || fingerprint(child))

use sha2::{Digest, Sha256};

use parley_contracts::argument::Argument;

/// Parent hash used for arguments that rebut nothing.
pub const ROOT_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Lowercase hex SHA-256 of `argument.canonical()`.
pub fn fingerprint(argument: &Argument) -> String {
    let mut hasher = Sha256::new();
    hasher.update(argument.canonical().as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash linking an argument's fingerprint to its parent's thread hash.
pub fn thread_hash(parent_hash: &str, fingerprint: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(parent_hash.as_bytes());
    hasher.update(fingerprint.as_bytes());
    hex::encode(hasher.finalize())
}
