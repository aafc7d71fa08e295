//! Inspect command implementation.

use croptrace_core::{CodecConfig, PayloadCodec, PayloadSigner};

use super::read_input;

/// Decoding needs no secret or link configuration; placeholder values keep
/// the codec constructible.
fn decode_only_codec() -> PayloadCodec {
    PayloadCodec::new(
        CodecConfig {
            scan_base_url: String::new(),
            api_base_url: String::new(),
            web_base_url: String::new(),
            blockchain_explorer_url: String::new(),
        },
        PayloadSigner::new(""),
    )
}

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let payload = read_input(input)?;
    let envelope = decode_only_codec()
        .decode(payload.trim())
        .map_err(|e| format!("Decode failed: {}", e))?;

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    if !envelope.is_signed() {
        eprintln!("Warning: payload carries no signature");
    }

    Ok(())
}
