use croptrace_canonical::{CanonicalRecord, RecordKind, Timestamp};
use serde::{Deserialize, Serialize};

/// Payload protocol version understood by this codec.
///
/// Decoders reject any payload declaring a different version instead of
/// guessing at its layout.
pub const PAYLOAD_VERSION: u32 = 1;

/// Canonical follow-up links synthesized at encode time.
///
/// Each link is a fully-formed URI derived from record identifiers;
/// `blockchain` is present only when the record carries a confirmed
/// on-chain anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadUrls {
    /// Scan endpoint that resolves back to this record.
    pub scan: String,
    /// REST endpoint serving the underlying record.
    pub api: String,
    /// Web dashboard page for the referenced batch.
    pub web: String,
    /// Block explorer link for the anchoring transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<String>,
}

/// The unit exchanged through a visual code.
///
/// Envelopes are immutable values: encode and decode always produce fresh
/// copies, and any mutation of `data` after signing invalidates the
/// signature. Deserialization goes through [`crate::PayloadCodec::decode`],
/// which reads `type` and `version` before touching `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadEnvelope {
    /// Record kind, fixed at creation.
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// Protocol version this envelope was encoded under.
    pub version: u32,
    /// The signed record.
    pub data: CanonicalRecord,
    /// Canonical follow-up links.
    pub urls: PayloadUrls,
    /// Integrity signature over `(type, version, canonical(data))`.
    /// An absent signature marks the envelope untrusted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Creation timestamp, set once at encode time.
    pub generated_at: Timestamp,
}

impl PayloadEnvelope {
    /// Whether the envelope carries a signature at all.
    ///
    /// Presence says nothing about validity; use
    /// [`crate::PayloadCodec::verify_envelope`] for that.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}
