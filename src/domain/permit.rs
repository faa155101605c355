//! Recoverable secp256k1 signature carried by a permit.

use alloy_primitives::keccak256;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::DexError;

/// A precomputed `(v, r, s)` triple over an EIP-712 digest.
///
/// `v` accepts both the raw recovery id (`0`/`1`) and the legacy
/// `27`/`28` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermitSignature {
    /// Recovery id.
    pub v: u8,
    /// `r` scalar, big-endian.
    pub r: [u8; 32],
    /// `s` scalar, big-endian.
    pub s: [u8; 32],
}

impl PermitSignature {
    /// Builds a signature from its parts.
    #[must_use]
    pub const fn new(v: u8, r: [u8; 32], s: [u8; 32]) -> Self {
        Self { v, r, s }
    }

    /// Recovers the address that signed `digest`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidSignature`] if `v` is out of range, the
    /// scalars are malformed, or no key recovers.
    pub fn recover(&self, digest: &[u8; 32]) -> Result<Address, DexError> {
        let v = match self.v {
            27 | 28 => self.v - 27,
            0 | 1 => self.v,
            _ => return Err(DexError::InvalidSignature),
        };
        let recovery_id = RecoveryId::from_byte(v).ok_or(DexError::InvalidSignature)?;

        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&self.r);
        rs[32..].copy_from_slice(&self.s);
        let signature = Signature::from_slice(&rs).map_err(|_| DexError::InvalidSignature)?;

        let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
            .map_err(|_| DexError::InvalidSignature)?;
        Ok(signer_address(&key))
    }
}

/// Account address of a secp256k1 public key: the low 20 bytes of the
/// keccak hash of the uncompressed point without its prefix byte.
#[must_use]
pub fn signer_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_word(&hash.0)
}
