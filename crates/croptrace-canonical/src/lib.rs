//! Canonical record model for croptrace supply-chain payloads.
//!
//! This crate owns every field that participates in payload signing:
//! - Typed records for the three payload kinds (batch, event, certificate)
//! - Identifier and timestamp newtypes with pattern validation
//! - The record normalizer that turns loosely-typed input into a
//!   strictly-typed canonical record
//! - RFC 8785 canonicalization producing deterministic bytes for signing
//!
//! Normalization runs once at the boundary; everything downstream of it
//! operates on `CanonicalRecord` values only.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic signing bytes.
pub mod canonicalizer;
/// Identifier and timestamp newtypes.
pub mod identifiers;
/// Record normalization from loosely-typed JSON input.
pub mod normalize;
/// Typed records for the three payload kinds.
pub mod records;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{canonical_bytes, canonicalize_record, CanonicalizationError};
pub use identifiers::{BatchId, CertificateId, EventId, HarvestDate, IpfsHash, Timestamp};
pub use normalize::{
    normalize, normalize_batch, normalize_certificate, normalize_event, NormalizationError,
};
pub use records::{
    BatchRecord, BatchStatus, BlockchainAnchor, CanonicalRecord, CertificateRecord, EventRecord,
    QualityGrade, RecordKind,
};
pub use validation::ValidationError;
