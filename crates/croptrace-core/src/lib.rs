//! Signed payload envelope, codec, and scan resolution for croptrace.
//!
//! This crate provides:
//! - The versioned payload envelope exchanged through visual codes
//! - HMAC-SHA256 signing and constant-time verification over canonical bytes
//! - The codec that serializes envelopes to and from the wire string
//! - The single-shot scan resolver that classifies scanned strings
//!
//! Core invariants:
//! - Signatures are a pure function of `(type, version, canonical(data))`
//! - Envelopes are value types; a status change produces a fresh envelope
//! - Verification failure is an outcome, never an abort
//! - Decoding is structural only; payload content is never evaluated
//!
#![deny(missing_docs)]

/// Payload envelope and URL set.
pub mod envelope;
/// Error types for encode, decode, and enrichment.
pub mod errors;
/// Scan resolution state machine and the enrichment lookup trait.
pub mod resolver;
/// HMAC payload signing and constant-time verification.
pub mod signer;
/// Wire codec for payload envelopes.
pub mod codec;

pub use codec::{CodecConfig, EncodedPayload, PayloadCodec};
pub use envelope::{PayloadEnvelope, PayloadUrls, PAYLOAD_VERSION};
pub use errors::{DecodeError, EncodeError, EnrichmentError};
pub use resolver::{BatchLookup, EnrichmentOutcome, ScanOutcome, ScanResolver, TrustLevel};
pub use signer::PayloadSigner;
