//! Deterministic encoding and hashing.
//!
//! Checksums must not depend on serde's field order or whitespace, so they are
//! computed over canonical JSON bytes.

pub mod canonical_json;
pub mod hashing;
