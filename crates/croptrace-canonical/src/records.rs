use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifiers::{BatchId, CertificateId, EventId, HarvestDate, IpfsHash, Timestamp};

/// Payload kind discriminator, serialized as the wire `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Produce batch snapshot.
    #[serde(rename = "batch_tracking")]
    Batch,
    /// Supply-chain event attached to a batch.
    #[serde(rename = "event_tracking")]
    Event,
    /// Certificate issued against a batch.
    #[serde(rename = "certificate")]
    Certificate,
}

impl RecordKind {
    /// Wire name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Batch => "batch_tracking",
            RecordKind::Event => "event_tracking",
            RecordKind::Certificate => "certificate",
        }
    }

    /// Parses a wire name into a kind, or `None` if unrecognized.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "batch_tracking" => Some(RecordKind::Batch),
            "event_tracking" => Some(RecordKind::Event),
            "certificate" => Some(RecordKind::Certificate),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality grade assigned at harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityGrade {
    /// Premium grade.
    A,
    /// Standard grade.
    B,
    /// Processing grade.
    C,
}

impl QualityGrade {
    /// Parses a grade letter, or `None` if outside `{A, B, C}`.
    pub fn from_letter(value: &str) -> Option<Self> {
        match value {
            "A" => Some(QualityGrade::A),
            "B" => Some(QualityGrade::B),
            "C" => Some(QualityGrade::C),
            _ => None,
        }
    }
}

/// Batch lifecycle status. Transitions are forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    /// Registered by the farmer.
    Registered,
    /// Left the farm.
    InTransit,
    /// Received by a wholesaler.
    AtWholesaler,
    /// Received by a retailer.
    AtRetailer,
    /// Sold; terminal state.
    SoldToConsumer,
}

impl BatchStatus {
    /// Whether moving to `next` is a legal forward transition.
    ///
    /// Skipping intermediate stages is allowed; moving backwards or
    /// re-asserting the current status is not.
    pub fn can_advance_to(&self, next: BatchStatus) -> bool {
        next > *self
    }

    /// Parses a wire status string, or `None` if unrecognized.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "REGISTERED" => Some(BatchStatus::Registered),
            "IN_TRANSIT" => Some(BatchStatus::InTransit),
            "AT_WHOLESALER" => Some(BatchStatus::AtWholesaler),
            "AT_RETAILER" => Some(BatchStatus::AtRetailer),
            "SOLD_TO_CONSUMER" => Some(BatchStatus::SoldToConsumer),
            _ => None,
        }
    }
}

/// On-chain anchor for a batch that has been registered on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainAnchor {
    /// Whether the batch registration transaction was confirmed.
    pub on_blockchain: bool,
    /// Transaction hash of the registration, if confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    /// Block number of the registration, if confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

/// Canonical snapshot of a produce batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    /// Unique business key (e.g. `BCH001`).
    pub batch_id: BatchId,
    /// Kind of produce (e.g. `Tomatoes`).
    pub produce_type: String,
    /// Farmer name or identifier.
    pub farmer: String,
    /// Harvest calendar date.
    pub harvest_date: HarvestDate,
    /// Quality grade assigned at harvest.
    pub quality_grade: QualityGrade,
    /// Quantity in kilograms; always positive.
    pub quantity: u64,
    /// Origin location.
    pub location: String,
    /// Current lifecycle status.
    pub status: BatchStatus,
    /// Free-text notes attached at registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Content identifier for off-chain batch documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipfs_hash: Option<IpfsHash>,
    /// On-chain anchor, present once the batch is registered on the ledger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<BlockchainAnchor>,
}

/// Supply-chain event referencing a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Unique event identifier.
    pub event_id: EventId,
    /// Batch this event refers to (foreign reference, not ownership).
    pub batch_id: BatchId,
    /// Actor who recorded the event.
    pub actor: String,
    /// Event kind (e.g. `PICKUP`, `QUALITY_CHECK`).
    pub event_type: String,
    /// Human-readable description.
    pub description: String,
    /// When the event occurred.
    pub timestamp: Timestamp,
    /// Where the event occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Content identifier for attached evidence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipfs_hash: Option<IpfsHash>,
}

/// Certificate issued against a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// Unique certificate identifier.
    pub certificate_id: CertificateId,
    /// Issuing authority.
    pub issuer: String,
    /// Batch the certificate applies to.
    pub subject: BatchId,
    /// Claim name to claim value (e.g. `organic` -> `EU 2018/848`).
    pub claims: BTreeMap<String, String>,
    /// When the certificate was issued.
    pub issued_at: Timestamp,
    /// When the certificate lapses, if it does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

/// A normalized record of any payload kind.
///
/// Serializes untagged: the envelope carries the discriminator in its
/// `type` field, so `data` is the bare record object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalRecord {
    /// Batch snapshot.
    Batch(BatchRecord),
    /// Supply-chain event.
    Event(EventRecord),
    /// Certificate.
    Certificate(CertificateRecord),
}

impl CanonicalRecord {
    /// Payload kind of this record.
    pub fn kind(&self) -> RecordKind {
        match self {
            CanonicalRecord::Batch(_) => RecordKind::Batch,
            CanonicalRecord::Event(_) => RecordKind::Event,
            CanonicalRecord::Certificate(_) => RecordKind::Certificate,
        }
    }

    /// Primary business key: batch ID, event ID, or certificate ID.
    pub fn business_key(&self) -> &str {
        match self {
            CanonicalRecord::Batch(b) => b.batch_id.as_ref(),
            CanonicalRecord::Event(e) => e.event_id.as_ref(),
            CanonicalRecord::Certificate(c) => c.certificate_id.as_ref(),
        }
    }

    /// The batch this record describes or references.
    pub fn batch_reference(&self) -> &BatchId {
        match self {
            CanonicalRecord::Batch(b) => &b.batch_id,
            CanonicalRecord::Event(e) => &e.batch_id,
            CanonicalRecord::Certificate(c) => &c.subject,
        }
    }

    /// Confirmed on-chain anchor, if the record carries one.
    pub fn blockchain_anchor(&self) -> Option<&BlockchainAnchor> {
        match self {
            CanonicalRecord::Batch(b) => b.blockchain.as_ref().filter(|a| a.on_blockchain),
            _ => None,
        }
    }
}
