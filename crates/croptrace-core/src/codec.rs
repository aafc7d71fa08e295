use serde_json::Value;

use croptrace_canonical::{canonicalize_record, CanonicalRecord, RecordKind, Timestamp};

use crate::envelope::{PayloadEnvelope, PayloadUrls, PAYLOAD_VERSION};
use crate::errors::{DecodeError, EncodeError};
use crate::signer::PayloadSigner;

/// Base URLs for the canonical link set. All values are caller-supplied;
/// nothing is hard-coded inside the codec.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Base URL of the scan endpoint (`{scan}/scan/{key}`).
    pub scan_base_url: String,
    /// Base URL of the REST API (`{api}/api/{collection}/{key}`).
    pub api_base_url: String,
    /// Base URL of the web dashboard (`{web}/batch/{batchId}`).
    pub web_base_url: String,
    /// Base URL of the block explorer (`{explorer}/tx/{hash}`).
    pub blockchain_explorer_url: String,
}

/// Result of encoding a record: the wire string plus the envelope it
/// serializes.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPayload {
    /// The serialized payload string embedded in the visual code.
    pub payload: String,
    /// The envelope the string serializes.
    pub envelope: PayloadEnvelope,
}

/// Clock used to stamp `generatedAt`; injectable for deterministic tests.
pub type Clock = fn() -> Timestamp;

/// Assembles and serializes payload envelopes.
///
/// The wire format is a single JSON document with fields
/// `{type, version, data, urls, signature, generatedAt}` — human-inspectable
/// and self-describing: `type` and `version` are read before `data` is
/// parsed. Decoding is structural only.
pub struct PayloadCodec {
    config: CodecConfig,
    signer: PayloadSigner,
    clock: Clock,
}

impl PayloadCodec {
    /// Creates a codec stamping envelopes with the current UTC time.
    pub fn new(config: CodecConfig, signer: PayloadSigner) -> Self {
        Self::with_clock(config, signer, Timestamp::now)
    }

    /// Creates a codec with an explicit clock.
    pub fn with_clock(config: CodecConfig, signer: PayloadSigner, clock: Clock) -> Self {
        Self {
            config,
            signer,
            clock,
        }
    }

    /// Encodes a normalized record into a signed, serialized envelope.
    pub fn encode(&self, record: &CanonicalRecord) -> Result<EncodedPayload, EncodeError> {
        let canonical = canonicalize_record(record)?;
        let kind = record.kind();
        let signature = self.signer.sign(kind, PAYLOAD_VERSION, &canonical);
        let envelope = PayloadEnvelope {
            kind,
            version: PAYLOAD_VERSION,
            data: record.clone(),
            urls: self.build_urls(record),
            signature: Some(signature),
            generated_at: (self.clock)(),
        };
        let payload = serde_json::to_string(&envelope)
            .map_err(|e| EncodeError::Serialization(e.to_string()))?;
        Ok(EncodedPayload { payload, envelope })
    }

    /// Decodes a scanned string into an envelope.
    ///
    /// `type` and `version` are read first; a version other than
    /// [`PAYLOAD_VERSION`] or an unknown type fails cleanly before any of
    /// `data` is interpreted.
    pub fn decode(&self, payload: &str) -> Result<PayloadEnvelope, DecodeError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| DecodeError::MalformedPayload(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::MalformedPayload("payload is not an object".into()))?;

        let version = object
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| DecodeError::MalformedPayload("missing or non-integer version".into()))?;
        if version != u64::from(PAYLOAD_VERSION) {
            return Err(DecodeError::UnsupportedVersion(
                u32::try_from(version).unwrap_or(u32::MAX),
            ));
        }
        let version = PAYLOAD_VERSION;

        let kind_str = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::MalformedPayload("missing type".into()))?;
        let kind = RecordKind::from_wire(kind_str)
            .ok_or_else(|| DecodeError::UnknownType(kind_str.to_string()))?;

        let data_value = object
            .get("data")
            .cloned()
            .ok_or_else(|| DecodeError::MalformedPayload("missing data".into()))?;
        let data = parse_data(kind, data_value)?;

        let urls: PayloadUrls = object
            .get("urls")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| DecodeError::MalformedPayload(format!("invalid urls: {}", e)))?
            .ok_or_else(|| DecodeError::MalformedPayload("missing urls".into()))?;

        let signature = match object.get("signature") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(DecodeError::MalformedPayload(
                    "signature must be a string".into(),
                ))
            }
        };

        let generated_at = object
            .get("generatedAt")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::MalformedPayload("missing generatedAt".into()))
            .and_then(|s| {
                Timestamp::parse(s)
                    .map_err(|e| DecodeError::MalformedPayload(format!("invalid generatedAt: {}", e)))
            })?;

        Ok(PayloadEnvelope {
            kind,
            version,
            data,
            urls,
            signature,
            generated_at,
        })
    }

    /// Recomputes the envelope signature and compares in constant time.
    ///
    /// Returns `false` on an absent signature or when the record cannot be
    /// canonicalized; never panics or errors.
    pub fn verify_envelope(&self, envelope: &PayloadEnvelope) -> bool {
        let Some(signature) = envelope.signature.as_deref() else {
            return false;
        };
        let Ok(canonical) = canonicalize_record(&envelope.data) else {
            return false;
        };
        self.signer
            .verify(envelope.kind, envelope.version, &canonical, signature)
    }

    fn build_urls(&self, record: &CanonicalRecord) -> PayloadUrls {
        let key = record.business_key();
        let collection = match record.kind() {
            RecordKind::Batch => "batches",
            RecordKind::Event => "events",
            RecordKind::Certificate => "certificates",
        };
        let blockchain = record.blockchain_anchor().and_then(|anchor| {
            anchor.transaction_hash.as_ref().map(|hash| {
                format!("{}/tx/{}", trim_base(&self.config.blockchain_explorer_url), hash)
            })
        });

        PayloadUrls {
            scan: format!("{}/scan/{}", trim_base(&self.config.scan_base_url), key),
            api: format!(
                "{}/api/{}/{}",
                trim_base(&self.config.api_base_url),
                collection,
                key
            ),
            web: format!(
                "{}/batch/{}",
                trim_base(&self.config.web_base_url),
                record.batch_reference().as_ref()
            ),
            blockchain,
        }
    }
}

fn parse_data(kind: RecordKind, value: Value) -> Result<CanonicalRecord, DecodeError> {
    let record = match kind {
        RecordKind::Batch => serde_json::from_value(value).map(CanonicalRecord::Batch),
        RecordKind::Event => serde_json::from_value(value).map(CanonicalRecord::Event),
        RecordKind::Certificate => serde_json::from_value(value).map(CanonicalRecord::Certificate),
    };
    record.map_err(|e| DecodeError::MalformedPayload(format!("invalid {} data: {}", kind, e)))
}

fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}
