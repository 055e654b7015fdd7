//! Cryptographic key pairs and signatures.
//!
//! Ntree bundles one independent ed25519 signature per participant; nothing
//! is ever aggregated, so a single key type is enough.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cryptographic key pair for signing.
#[derive(Clone)]
pub struct KeyPair(ed25519_dalek::SigningKey);

impl KeyPair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        KeyPair(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Generate a keypair from a seed (for testing/simulation).
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        KeyPair(ed25519_dalek::SigningKey::from_bytes(seed))
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        use ed25519_dalek::Signer;
        let sig = self.0.sign(message);
        Signature(sig.to_bytes().to_vec())
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key().to_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({:?})", self.public_key())
    }
}

/// A public key for signature verification.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Verify a signature.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        use ed25519_dalek::Verifier;
        let pk = match ed25519_dalek::VerifyingKey::from_bytes(&self.0) {
            Ok(pk) => pk,
            Err(_) => return false,
        };
        let sig_array: [u8; 64] = match signature.0.as_slice().try_into() {
            Ok(arr) => arr,
            Err(_) => return false,
        };
        let sig = ed25519_dalek::Signature::from_bytes(&sig_array);
        pk.verify(message, &sig).is_ok()
    }

    /// Get the key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

/// A cryptographic signature (64 bytes of ed25519).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Create a zero/placeholder signature for testing.
    pub fn zero() -> Self {
        Signature(vec![0u8; 64])
    }

    /// Create a signature from raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Signature(bytes)
    }

    /// Get signature as bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.clone()
    }

    /// Get signature as byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", &hex::encode(&self.0)[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let keypair = KeyPair::generate();
        let message = b"test message";

        let signature = keypair.sign(message);
        let pubkey = keypair.public_key();

        assert!(pubkey.verify(message, &signature));
    }

    #[test]
    fn test_verify_fails_wrong_message() {
        let keypair = KeyPair::generate();
        let message = b"test message";
        let wrong = b"wrong message";

        let signature = keypair.sign(message);
        let pubkey = keypair.public_key();

        assert!(!pubkey.verify(wrong, &signature));
    }

    #[test]
    fn test_verify_fails_wrong_key() {
        let keypair = KeyPair::generate();
        let other = KeyPair::generate();
        let message = b"test message";

        let signature = keypair.sign(message);
        assert!(!other.public_key().verify(message, &signature));
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        let keypair = KeyPair::generate();
        let bad = Signature::from_bytes(vec![1, 2, 3]);
        assert!(!keypair.public_key().verify(b"msg", &bad));
    }

    #[test]
    fn test_keypair_from_seed() {
        let seed = [42u8; 32];

        let kp1 = KeyPair::from_seed(&seed);
        let kp2 = KeyPair::from_seed(&seed);

        let msg = b"test";
        assert_eq!(kp1.sign(msg).to_bytes(), kp2.sign(msg).to_bytes());
        assert_eq!(kp1.public_key(), kp2.public_key());
    }
}
