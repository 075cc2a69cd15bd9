//! Hashing utilities for docport.
//!
//! Document checksums are domain-separated so that a checksum can never be
//! confused with a plain hash of the same bytes.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::determinism::canonical_json;
use crate::errors::DocportResult;

/// Domain label mixed into document checksums. Must remain stable.
pub const DOCUMENT_CHECKSUM_DOMAIN: &str = "docport.v1.document";

/// SHA-256 of raw bytes as a lowercase hex string.
pub fn hash_bytes_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Domain-separated hash of a canonical JSON value.
pub fn hash_canonical_json_hex(value: &Value) -> DocportResult<String> {
    let mut buf = Vec::new();
    buf.extend_from_slice(DOCUMENT_CHECKSUM_DOMAIN.as_bytes());
    buf.extend_from_slice(&canonical_json::to_canonical_bytes(value)?);
    Ok(hash_bytes_hex(&buf))
}
