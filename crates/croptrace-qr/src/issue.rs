use croptrace_canonical::{BatchRecord, CanonicalRecord, CertificateRecord, EventRecord};
use croptrace_core::{EncodeError, PayloadCodec, PayloadEnvelope};

use crate::render::{QrRenderer, RenderError, RenderOptions};

/// Errors from the combined encode-and-render path.
#[derive(thiserror::Error, Debug)]
pub enum IssueError {
    /// Encoding the record into a payload failed.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    /// Rendering the payload into a visual code failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Everything a caller needs after issuing a code for a record.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// PNG artifact as a data URL.
    pub image_data_url: String,
    /// Scan endpoint resolving back to the record.
    pub scan_url: String,
    /// The signed envelope embedded in the code.
    pub envelope: PayloadEnvelope,
}

/// Issues a visual code for a batch record.
pub fn issue_batch(
    record: &BatchRecord,
    codec: &PayloadCodec,
    options: &RenderOptions,
) -> Result<IssuedCode, IssueError> {
    issue(CanonicalRecord::Batch(record.clone()), codec, options)
}

/// Issues visual codes for a set of batch records.
///
/// Outcomes are per-record: one oversized or unencodable record does not
/// abort the rest of the run.
pub fn issue_batches(
    records: &[BatchRecord],
    codec: &PayloadCodec,
    options: &RenderOptions,
) -> Vec<Result<IssuedCode, IssueError>> {
    records
        .iter()
        .map(|record| issue_batch(record, codec, options))
        .collect()
}

/// Issues a visual code for a supply-chain event record.
pub fn issue_event(
    record: &EventRecord,
    codec: &PayloadCodec,
    options: &RenderOptions,
) -> Result<IssuedCode, IssueError> {
    issue(CanonicalRecord::Event(record.clone()), codec, options)
}

/// Issues a visual code for a certificate record.
pub fn issue_certificate(
    record: &CertificateRecord,
    codec: &PayloadCodec,
    options: &RenderOptions,
) -> Result<IssuedCode, IssueError> {
    issue(CanonicalRecord::Certificate(record.clone()), codec, options)
}

fn issue(
    record: CanonicalRecord,
    codec: &PayloadCodec,
    options: &RenderOptions,
) -> Result<IssuedCode, IssueError> {
    let encoded = codec.encode(&record)?;
    let rendered = QrRenderer::new().render(&encoded, options)?;
    Ok(IssuedCode {
        image_data_url: rendered.image_data_url,
        scan_url: rendered.scan_url,
        envelope: encoded.envelope,
    })
}
