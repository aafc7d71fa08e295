use std::collections::BTreeMap;

use serde_json::Value;

use crate::identifiers::{BatchId, CertificateId, EventId, HarvestDate, IpfsHash, Timestamp};
use crate::records::{
    BatchRecord, BatchStatus, BlockchainAnchor, CanonicalRecord, CertificateRecord, EventRecord,
    QualityGrade, RecordKind,
};

/// Default farmer attribution when the caller omits one.
const UNKNOWN_FARMER: &str = "Unknown Farmer";

/// Errors produced while normalizing a loosely-typed input record.
#[derive(thiserror::Error, Debug)]
pub enum NormalizationError {
    /// A required field is absent.
    #[error("missing required field: {0}")]
    MissingField(String),
    /// A field is present but out of range or malformed.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field that failed validation.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl NormalizationError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        NormalizationError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Normalizes a loosely-typed record into the canonical form for `kind`.
///
/// Pure transformation: validates required fields and value ranges, applies
/// the documented defaults, and produces a strictly-typed record whose
/// canonical serialization is independent of input field order.
pub fn normalize(kind: RecordKind, raw: &Value) -> Result<CanonicalRecord, NormalizationError> {
    match kind {
        RecordKind::Batch => normalize_batch(raw).map(CanonicalRecord::Batch),
        RecordKind::Event => normalize_event(raw).map(CanonicalRecord::Event),
        RecordKind::Certificate => normalize_certificate(raw).map(CanonicalRecord::Certificate),
    }
}

/// Normalizes a batch record.
///
/// `farmer` defaults to `Unknown Farmer` and `status` to `REGISTERED` when
/// absent, matching how batches are registered upstream.
pub fn normalize_batch(raw: &Value) -> Result<BatchRecord, NormalizationError> {
    let batch_id = BatchId::parse(require_str(raw, "batchId")?)
        .map_err(|e| NormalizationError::invalid("batchId", e.to_string()))?;
    let produce_type = require_nonempty(raw, "produceType")?;
    let farmer = match optional_str(raw, "farmer")? {
        Some(f) if !f.trim().is_empty() => f.trim().to_string(),
        _ => UNKNOWN_FARMER.to_string(),
    };
    let harvest_date = HarvestDate::parse(require_str(raw, "harvestDate")?)
        .map_err(|e| NormalizationError::invalid("harvestDate", e.to_string()))?;
    let quality_grade = require_grade(raw, "qualityGrade")?;
    let quantity = require_quantity(raw, "quantity")?;
    let location = require_nonempty(raw, "location")?;
    let status = match optional_str(raw, "status")? {
        Some(s) => BatchStatus::from_wire(&s)
            .ok_or_else(|| NormalizationError::invalid("status", format!("unknown status '{}'", s)))?,
        None => BatchStatus::Registered,
    };
    let notes = optional_str(raw, "notes")?.filter(|n| !n.trim().is_empty());
    let ipfs_hash = optional_str(raw, "ipfsHash")?
        .map(|h| {
            IpfsHash::parse(h).map_err(|e| NormalizationError::invalid("ipfsHash", e.to_string()))
        })
        .transpose()?;
    let blockchain = normalize_anchor(raw)?;

    Ok(BatchRecord {
        batch_id,
        produce_type,
        farmer,
        harvest_date,
        quality_grade,
        quantity,
        location,
        status,
        notes,
        ipfs_hash,
        blockchain,
    })
}

/// Normalizes a supply-chain event record.
pub fn normalize_event(raw: &Value) -> Result<EventRecord, NormalizationError> {
    let event_id = EventId::parse(require_str(raw, "eventId")?)
        .map_err(|e| NormalizationError::invalid("eventId", e.to_string()))?;
    let batch_id = BatchId::parse(require_str(raw, "batchId")?)
        .map_err(|e| NormalizationError::invalid("batchId", e.to_string()))?;
    let actor = require_nonempty(raw, "actor")?;
    let event_type = require_nonempty(raw, "eventType")?;
    let description = optional_str(raw, "description")?.unwrap_or_default();
    let timestamp = Timestamp::parse(require_str(raw, "timestamp")?)
        .map_err(|e| NormalizationError::invalid("timestamp", e.to_string()))?;
    let location = optional_str(raw, "location")?.filter(|l| !l.trim().is_empty());
    let ipfs_hash = optional_str(raw, "ipfsHash")?
        .map(|h| {
            IpfsHash::parse(h).map_err(|e| NormalizationError::invalid("ipfsHash", e.to_string()))
        })
        .transpose()?;

    Ok(EventRecord {
        event_id,
        batch_id,
        actor,
        event_type,
        description,
        timestamp,
        location,
        ipfs_hash,
    })
}

/// Normalizes a certificate record.
pub fn normalize_certificate(raw: &Value) -> Result<CertificateRecord, NormalizationError> {
    let certificate_id = CertificateId::parse(require_str(raw, "certificateId")?)
        .map_err(|e| NormalizationError::invalid("certificateId", e.to_string()))?;
    let issuer = require_nonempty(raw, "issuer")?;
    let subject = BatchId::parse(require_str(raw, "subject")?)
        .map_err(|e| NormalizationError::invalid("subject", e.to_string()))?;
    let claims = match raw.get("claims") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(map)) => {
            let mut claims = BTreeMap::new();
            for (name, value) in map {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(NormalizationError::invalid(
                            "claims",
                            format!("claim '{}' must be a scalar, got {}", name, kind_of(other)),
                        ))
                    }
                };
                claims.insert(name.clone(), text);
            }
            claims
        }
        Some(other) => {
            return Err(NormalizationError::invalid(
                "claims",
                format!("expected object, got {}", kind_of(other)),
            ))
        }
    };
    let issued_at = Timestamp::parse(require_str(raw, "issuedAt")?)
        .map_err(|e| NormalizationError::invalid("issuedAt", e.to_string()))?;
    let expires_at = optional_str(raw, "expiresAt")?
        .map(|t| {
            Timestamp::parse(t).map_err(|e| NormalizationError::invalid("expiresAt", e.to_string()))
        })
        .transpose()?;

    Ok(CertificateRecord {
        certificate_id,
        issuer,
        subject,
        claims,
        issued_at,
        expires_at,
    })
}

fn normalize_anchor(raw: &Value) -> Result<Option<BlockchainAnchor>, NormalizationError> {
    let anchor = match raw.get("blockchain") {
        None | Some(Value::Null) => return Ok(None),
        Some(obj @ Value::Object(_)) => obj,
        Some(other) => {
            return Err(NormalizationError::invalid(
                "blockchain",
                format!("expected object, got {}", kind_of(other)),
            ))
        }
    };

    let on_blockchain = anchor
        .get("onBlockchain")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let transaction_hash = optional_str(anchor, "transactionHash")?;
    let block_number = match anchor.get("blockNumber") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_u64().ok_or_else(|| {
            NormalizationError::invalid("blockNumber", "must be a non-negative integer")
        })?),
    };

    Ok(Some(BlockchainAnchor {
        on_blockchain,
        transaction_hash,
        block_number,
    }))
}

fn require_str(raw: &Value, field: &str) -> Result<String, NormalizationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(NormalizationError::MissingField(field.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(NormalizationError::invalid(
            field,
            format!("expected string, got {}", kind_of(other)),
        )),
    }
}

fn require_nonempty(raw: &Value, field: &str) -> Result<String, NormalizationError> {
    let value = require_str(raw, field)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NormalizationError::invalid(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn optional_str(raw: &Value, field: &str) -> Result<Option<String>, NormalizationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(NormalizationError::invalid(
            field,
            format!("expected string, got {}", kind_of(other)),
        )),
    }
}

fn require_grade(raw: &Value, field: &str) -> Result<QualityGrade, NormalizationError> {
    let value = require_str(raw, field)?;
    QualityGrade::from_letter(&value)
        .ok_or_else(|| NormalizationError::invalid(field, "must be one of A, B, C"))
}

/// Quantities arrive as JSON numbers or numeric strings from the upstream
/// API; both forms normalize to a positive integer.
fn require_quantity(raw: &Value, field: &str) -> Result<u64, NormalizationError> {
    let value = raw
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| NormalizationError::MissingField(field.to_string()))?;

    let quantity = match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| NormalizationError::invalid(field, "must be a positive integer"))?,
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| NormalizationError::invalid(field, "must be a positive integer"))?,
        other => {
            return Err(NormalizationError::invalid(
                field,
                format!("expected number, got {}", kind_of(other)),
            ))
        }
    };

    if quantity == 0 {
        return Err(NormalizationError::invalid(field, "must be greater than zero"));
    }
    Ok(quantity)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
