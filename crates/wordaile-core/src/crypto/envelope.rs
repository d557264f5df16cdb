//! Signed message envelopes.
//!
//! signature = ECDSA_sign(sk, SHA256(json(payload)))
//! The host signs every board broadcast; participants check the signature
//! against the host's published public key before answering.

use secp256k1::{ecdsa::Signature, All, Message, PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// Errors from signing or checking envelopes
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// A payload together with the signer's key and signature
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedEnvelope<T> {
    pub payload: T,
    /// Hex compact ECDSA signature
    pub signature: String,
    /// Hex compressed public key of the signer
    pub public_key: String,
}

/// Result of checking an envelope
#[derive(Clone, Debug)]
pub struct Verification<T> {
    pub valid: bool,
    pub payload: T,
}

/// Holds the host's signing key pair
pub struct MessageSigner {
    secp: Secp256k1<All>,
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl MessageSigner {
    /// Create a signer with a fresh random key
    pub fn random() -> Self {
        let secp = Secp256k1::new();
        let secret_key = SecretKey::new(&mut rand::thread_rng());
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secp,
            secret_key,
            public_key,
        }
    }

    /// Load a signer from a hex-encoded 32-byte secret key
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self, EnvelopeError> {
        let bytes = hex::decode(secret_hex.trim())
            .map_err(|e| EnvelopeError::InvalidKey(e.to_string()))?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|e| EnvelopeError::InvalidKey(e.to_string()))?;
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Ok(Self {
            secp,
            secret_key,
            public_key,
        })
    }

    /// Hex compressed public key, as participants configure it
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// Sign `payload`, wrapping it in an envelope
    pub fn sign<T: Serialize>(&self, payload: T) -> Result<SignedEnvelope<T>, EnvelopeError> {
        let message = Message::from_digest(digest(&payload)?);
        let signature = self.secp.sign_ecdsa(&message, &self.secret_key);

        Ok(SignedEnvelope {
            payload,
            signature: hex::encode(signature.serialize_compact()),
            public_key: self.public_key_hex(),
        })
    }
}

impl fmt::Debug for MessageSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageSigner({})", &self.public_key_hex()[..16])
    }
}

/// SHA-256 of the payload's JSON encoding
fn digest<T: Serialize>(payload: &T) -> Result<[u8; 32], EnvelopeError> {
    let bytes = serde_json::to_vec(payload)?;
    Ok(Sha256::digest(&bytes).into())
}

/// Check that `envelope` was signed by `expected_public_key` (hex).
///
/// A wrong signer, malformed signature or tampered payload yields
/// `valid: false`; only an unparsable expected key is an error.
pub fn authenticate<T: Serialize>(
    envelope: SignedEnvelope<T>,
    expected_public_key: &str,
) -> Result<Verification<T>, EnvelopeError> {
    let expected = hex::decode(expected_public_key.trim())
        .map_err(|e| EnvelopeError::InvalidKey(e.to_string()))
        .and_then(|bytes| {
            PublicKey::from_slice(&bytes).map_err(|e| EnvelopeError::InvalidKey(e.to_string()))
        })?;

    let valid = envelope.public_key.eq_ignore_ascii_case(&hex::encode(expected.serialize()))
        && check_signature(&envelope, &expected)?;

    Ok(Verification {
        valid,
        payload: envelope.payload,
    })
}

fn check_signature<T: Serialize>(
    envelope: &SignedEnvelope<T>,
    public_key: &PublicKey,
) -> Result<bool, EnvelopeError> {
    let signature = match hex::decode(&envelope.signature)
        .ok()
        .and_then(|bytes| Signature::from_compact(&bytes).ok())
    {
        Some(sig) => sig,
        None => return Ok(false),
    };

    let message = Message::from_digest(digest(&envelope.payload)?);
    let secp = Secp256k1::verification_only();
    Ok(secp.verify_ecdsa(&message, &signature, public_key).is_ok())
}
