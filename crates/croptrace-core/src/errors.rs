use thiserror::Error;

/// Errors that can occur while decoding a scanned payload string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The string is not parseable as the wire format.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    /// The payload declares a version this decoder does not understand.
    #[error("unsupported payload version: {0}")]
    UnsupportedVersion(u32),
    /// The payload declares a type outside the known record kinds.
    #[error("unknown payload type: '{0}'")]
    UnknownType(String),
}

/// Errors that can occur while encoding a record into a payload string.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Canonical byte production failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] croptrace_canonical::CanonicalizationError),
    /// Envelope serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Non-fatal errors from the enrichment lookup collaborator.
///
/// The resolver degrades to payload-only data on any of these; they never
/// abort a scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentError {
    /// The business key is absent from the store.
    #[error("batch not found in store")]
    NotFound,
    /// The lookup exceeded its time budget.
    #[error("enrichment lookup timed out")]
    Timeout,
    /// The store collaborator could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
