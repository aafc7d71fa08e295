use croptrace_canonical::{BatchId, BatchRecord};
use tracing::warn;

use crate::codec::PayloadCodec;
use crate::envelope::PayloadEnvelope;
use crate::errors::{DecodeError, EnrichmentError};

/// Enrichment lookup against the external batch store collaborator.
///
/// Implementations own their timeout behavior and surface
/// [`EnrichmentError::Timeout`] rather than blocking indefinitely. The
/// resolver functions fully without a store; enrichment only adds display
/// data.
pub trait BatchLookup {
    /// Resolves a batch by its business key.
    ///
    /// `Ok(None)` and `Err(EnrichmentError::NotFound)` are equivalent
    /// degraded outcomes, not failures of the scan.
    fn lookup_by_business_key(
        &self,
        batch_id: &BatchId,
    ) -> Result<Option<BatchRecord>, EnrichmentError>;
}

/// How much the caller may trust a resolved payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustLevel {
    /// Signature verified against the shared secret.
    Verified,
    /// Structurally valid but not authentic; display with a warning only.
    Untrusted,
}

/// Result of the optional enrichment step.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// No store was configured, or the record kind carries no batch link.
    Skipped,
    /// The referenced batch was found; merged fields for display.
    Found(BatchRecord),
    /// The referenced batch is absent from the store. Not an error.
    NotFound,
    /// The lookup failed; resolution proceeded with payload-only data.
    Failed(EnrichmentError),
}

/// Terminal state of a single scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The string is not a decodable payload.
    Rejected {
        /// Why decoding failed.
        reason: DecodeError,
    },
    /// Structurally valid payload whose signature is absent or wrong.
    /// The decoded envelope is exposed so callers can warn rather than
    /// silently drop it — but it must never be presented as verified.
    Untrusted {
        /// The decoded but unauthenticated envelope.
        envelope: PayloadEnvelope,
    },
    /// Decoded, verified, and (optionally) enriched.
    Resolved {
        /// The verified envelope.
        envelope: PayloadEnvelope,
        /// Always [`TrustLevel::Verified`] in this state; carried
        /// explicitly so downstream display code has one field to read.
        trust: TrustLevel,
        /// Result of the enrichment lookup.
        enrichment: EnrichmentOutcome,
    },
}

impl ScanOutcome {
    /// The decoded envelope, if the scan got past decoding.
    pub fn envelope(&self) -> Option<&PayloadEnvelope> {
        match self {
            ScanOutcome::Rejected { .. } => None,
            ScanOutcome::Untrusted { envelope } => Some(envelope),
            ScanOutcome::Resolved { envelope, .. } => Some(envelope),
        }
    }
}

/// Single-shot scan pipeline: decode, verify, enrich.
///
/// Every step is synchronous and nothing is retried; decode and verify
/// failures are typed outcomes, and enrichment failures degrade to
/// payload-only data.
pub struct ScanResolver<'a> {
    codec: &'a PayloadCodec,
    store: Option<&'a dyn BatchLookup>,
}

impl<'a> ScanResolver<'a> {
    /// Creates a resolver without enrichment.
    pub fn new(codec: &'a PayloadCodec) -> Self {
        Self { codec, store: None }
    }

    /// Creates a resolver that enriches verified payloads from `store`.
    pub fn with_store(codec: &'a PayloadCodec, store: &'a dyn BatchLookup) -> Self {
        Self {
            codec,
            store: Some(store),
        }
    }

    /// Runs the scan state machine over an arbitrary scanned string.
    pub fn resolve(&self, scanned: &str) -> ScanOutcome {
        let envelope = match self.codec.decode(scanned) {
            Ok(envelope) => envelope,
            Err(reason) => return ScanOutcome::Rejected { reason },
        };

        if !self.codec.verify_envelope(&envelope) {
            return ScanOutcome::Untrusted { envelope };
        }

        let enrichment = self.enrich(&envelope);
        ScanOutcome::Resolved {
            envelope,
            trust: TrustLevel::Verified,
            enrichment,
        }
    }

    fn enrich(&self, envelope: &PayloadEnvelope) -> EnrichmentOutcome {
        let Some(store) = self.store else {
            return EnrichmentOutcome::Skipped;
        };
        let batch_id = envelope.data.batch_reference();
        match store.lookup_by_business_key(batch_id) {
            Ok(Some(record)) => EnrichmentOutcome::Found(record),
            Ok(None) | Err(EnrichmentError::NotFound) => EnrichmentOutcome::NotFound,
            Err(err) => {
                warn!(batch_id = batch_id.as_ref(), error = %err, "enrichment lookup failed");
                EnrichmentOutcome::Failed(err)
            }
        }
    }
}
