//! Keccak-256 hashing utilities
//!
//! Provides the Keccak-256 function used for transaction hashes, address
//! derivation and checksum casing.

use ethereum_types::H256;
use sha3::{Digest, Keccak256};

/// Computes Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes Keccak-256 hash and returns it as an `H256`
pub fn keccak256_h256(data: &[u8]) -> H256 {
    H256::from(keccak256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_h256() {
        let hash = keccak256_h256(b"hello world");
        assert_eq!(hash.as_bytes(), &keccak256(b"hello world"));
    }
}
