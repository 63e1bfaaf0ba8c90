//! Signing identities for ledger mutations and deployment signatures.
//!
//! An [`Identity`] is an opaque signing capability: it can report its public
//! key and sign bytes, nothing more. Components that mutate the ledger or
//! sign deployments take an `&dyn Identity` and never see secret material.
//!
//! One implementation exists per signature scheme. [`Ed25519Identity`] is the
//! shipped scheme; additional schemes add a variant to [`SignatureScheme`]
//! and their own implementing type.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;

use crate::error::{CoreError, Result};
use crate::ids::TwinId;

/// The signature scheme an identity signs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// Ed25519 over the raw message bytes.
    Ed25519,
}

/// An opaque signing capability bound to a messaging twin.
///
/// Implementations hold the secret key; callers only ever see the public key
/// and signatures.
pub trait Identity: Send + Sync {
    /// The twin this identity signs on behalf of.
    fn twin_id(&self) -> TwinId;

    /// The scheme signatures are produced under.
    fn scheme(&self) -> SignatureScheme;

    /// The public key bytes for this identity.
    fn public_key(&self) -> Vec<u8>;

    /// Sign a message, returning the raw signature bytes.
    fn sign(&self, message: &[u8]) -> Vec<u8>;

    /// Verify a signature produced by this identity's key.
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;
}

/// An Ed25519 signing identity.
pub struct Ed25519Identity {
    twin_id: TwinId,
    signing_key: SigningKey,
}

impl Ed25519Identity {
    /// Create an identity from a 32-byte secret seed.
    #[must_use]
    pub fn from_seed(twin_id: TwinId, seed: [u8; 32]) -> Self {
        Self {
            twin_id,
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create an identity from a secret seed slice.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidLength` if the slice is not 32 bytes.
    pub fn from_seed_slice(twin_id: TwinId, seed: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = seed.try_into().map_err(|_| CoreError::InvalidLength {
            what: "secret seed",
            expected: 32,
            got: seed.len(),
        })?;
        Ok(Self::from_seed(twin_id, bytes))
    }

    /// Generate a fresh identity with a random seed.
    #[must_use]
    pub fn generate(twin_id: TwinId) -> Self {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        Self::from_seed(twin_id, seed)
    }

    /// The verifying key for this identity.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl std::fmt::Debug for Ed25519Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret key.
        f.debug_struct("Ed25519Identity")
            .field("twin_id", &self.twin_id)
            .field("public_key", &hex::encode(self.public_key()))
            .finish_non_exhaustive()
    }
}

impl Identity for Ed25519Identity {
    fn twin_id(&self) -> TwinId {
        self.twin_id
    }

    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }

    fn public_key(&self) -> Vec<u8> {
        self.signing_key.verifying_key().to_bytes().to_vec()
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(bytes) = <[u8; 64]>::try_from(signature) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&bytes);
        self.signing_key
            .verifying_key()
            .verify(message, &signature)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let identity = Ed25519Identity::generate(TwinId::new(42));
        let signature = identity.sign(b"deployment challenge");

        assert_eq!(signature.len(), 64);
        assert!(identity.verify(b"deployment challenge", &signature));
        assert!(!identity.verify(b"different message", &signature));
    }

    #[test]
    fn deterministic_from_seed() {
        let a = Ed25519Identity::from_seed(TwinId::new(1), [7u8; 32]);
        let b = Ed25519Identity::from_seed(TwinId::new(1), [7u8; 32]);

        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.sign(b"msg"), b.sign(b"msg"));
    }

    #[test]
    fn seed_slice_length_checked() {
        let result = Ed25519Identity::from_seed_slice(TwinId::new(1), &[0u8; 16]);
        assert!(matches!(
            result,
            Err(CoreError::InvalidLength { expected: 32, got: 16, .. })
        ));
    }

    #[test]
    fn garbage_signature_rejected() {
        let identity = Ed25519Identity::generate(TwinId::new(3));
        assert!(!identity.verify(b"msg", &[0u8; 10]));
        assert!(!identity.verify(b"msg", &[0u8; 64]));
    }

    #[test]
    fn debug_hides_secret() {
        let identity = Ed25519Identity::from_seed(TwinId::new(9), [5u8; 32]);
        let output = format!("{identity:?}");
        assert!(output.contains("public_key"));
        assert!(!output.contains("0505050505050505050505050505050505050505050505050505050505050505"));
    }
}
