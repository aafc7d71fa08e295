//! Output formatting utilities.

use croptrace_core::{EnrichmentOutcome, ScanOutcome, TrustLevel};
use serde_json::{json, Value};

/// Formats a scan outcome as JSON.
pub fn outcome_json(outcome: &ScanOutcome) -> Value {
    match outcome {
        ScanOutcome::Rejected { reason } => json!({
            "outcome": "REJECTED",
            "reason": reason.to_string(),
        }),
        ScanOutcome::Untrusted { envelope } => json!({
            "outcome": "UNTRUSTED",
            "warning": "signature missing or invalid; do not treat data as verified",
            "envelope": serde_json::to_value(envelope).unwrap_or(Value::Null),
        }),
        ScanOutcome::Resolved {
            envelope,
            trust,
            enrichment,
        } => json!({
            "outcome": "RESOLVED",
            "trust": trust_str(*trust),
            "envelope": serde_json::to_value(envelope).unwrap_or(Value::Null),
            "enrichment": enrichment_json(enrichment),
        }),
    }
}

/// Prints a scan outcome as a human-readable report.
pub fn print_outcome(outcome: &ScanOutcome) {
    match outcome {
        ScanOutcome::Rejected { reason } => {
            println!("REJECTED: {}", reason);
        }
        ScanOutcome::Untrusted { envelope } => {
            println!("UNTRUSTED: signature missing or invalid");
            println!(
                "{:<12} {} ({})",
                "payload:",
                envelope.data.business_key(),
                envelope.kind
            );
            println!("Do not treat this data as verified.");
        }
        ScanOutcome::Resolved {
            envelope,
            trust,
            enrichment,
        } => {
            println!("RESOLVED ({})", trust_str(*trust));
            println!("{:<12} {}", "kind:", envelope.kind);
            println!("{:<12} {}", "key:", envelope.data.business_key());
            println!("{:<12} {}", "generated:", envelope.generated_at.as_ref());
            println!("{:<12} {}", "scan url:", envelope.urls.scan);
            match enrichment {
                EnrichmentOutcome::Skipped => {}
                EnrichmentOutcome::Found(record) => {
                    println!(
                        "{:<12} {} of {} ({} kg, grade {:?}, {:?})",
                        "store:",
                        record.batch_id.as_ref(),
                        record.produce_type,
                        record.quantity,
                        record.quality_grade,
                        record.status
                    );
                }
                EnrichmentOutcome::NotFound => {
                    println!("{:<12} batch not in store (payload data only)", "store:");
                }
                EnrichmentOutcome::Failed(err) => {
                    println!("{:<12} lookup failed: {} (payload data only)", "store:", err);
                }
            }
        }
    }
}

fn trust_str(trust: TrustLevel) -> &'static str {
    match trust {
        TrustLevel::Verified => "VERIFIED",
        TrustLevel::Untrusted => "UNTRUSTED",
    }
}

fn enrichment_json(enrichment: &EnrichmentOutcome) -> Value {
    match enrichment {
        EnrichmentOutcome::Skipped => json!({ "status": "SKIPPED" }),
        EnrichmentOutcome::Found(record) => json!({
            "status": "FOUND",
            "batch": serde_json::to_value(record).unwrap_or(Value::Null),
        }),
        EnrichmentOutcome::NotFound => json!({ "status": "NOT_FOUND" }),
        EnrichmentOutcome::Failed(err) => json!({
            "status": "FAILED",
            "error": err.to_string(),
        }),
    }
}
