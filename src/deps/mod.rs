//! Dependency fingerprints and the memoization record.
//!
//! - [`hash`] - MD5 fingerprint of the expanded requirement list
//! - [`cache`] - the `<deps_dir>/hash` record read and written by `prepare`

pub mod cache;
pub mod hash;

pub use cache::{DependencyCache, hash_matches, store};
pub use hash::{compute_hash, requirements_hash};
