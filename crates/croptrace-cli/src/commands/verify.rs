//! Verify command implementation.

use croptrace_core::{CodecConfig, PayloadCodec, PayloadSigner, ScanOutcome, ScanResolver};
use serde_json::json;

use super::read_input;

pub fn run(
    input: Option<String>,
    secret: String,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = read_input(input)?;
    let codec = PayloadCodec::new(
        CodecConfig {
            scan_base_url: String::new(),
            api_base_url: String::new(),
            web_base_url: String::new(),
            blockchain_explorer_url: String::new(),
        },
        PayloadSigner::new(secret),
    );

    let resolver = ScanResolver::new(&codec);
    let outcome = resolver.resolve(payload.trim());

    let (verdict, detail) = match &outcome {
        ScanOutcome::Resolved { .. } => ("VERIFIED", None),
        ScanOutcome::Untrusted { .. } => ("UNTRUSTED", None),
        ScanOutcome::Rejected { reason } => ("REJECTED", Some(reason.to_string())),
    };

    if json_output {
        let output = json!({
            "verdict": verdict,
            "detail": detail,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match &detail {
            Some(reason) => println!("{}: {}", verdict, reason),
            None => println!("{}", verdict),
        }
    }

    if strict && verdict != "VERIFIED" {
        std::process::exit(1);
    }

    Ok(())
}
