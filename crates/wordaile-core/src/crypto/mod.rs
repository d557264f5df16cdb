//! Cryptographic primitives for the Wordaile protocol.
//!
//! This module provides signed envelopes so participants can tell host
//! broadcasts apart from forged ones.

mod envelope;

pub use envelope::{authenticate, EnvelopeError, MessageSigner, SignedEnvelope, Verification};
