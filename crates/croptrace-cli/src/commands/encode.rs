//! Encode command implementation.

use croptrace_canonical::{normalize, RecordKind};
use croptrace_core::{CodecConfig, PayloadCodec, PayloadSigner};
use croptrace_qr::{QrRenderer, RenderOptions};
use serde_json::{json, Value};

use super::read_input;

#[allow(clippy::too_many_arguments)]
pub fn run(
    kind: RecordKind,
    input: Option<String>,
    secret: String,
    config: CodecConfig,
    width: u32,
    label: bool,
    image_out: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw: Value = serde_json::from_str(&read_input(input)?)
        .map_err(|e| format!("Invalid JSON: {}", e))?;

    let record = normalize(kind, &raw).map_err(|e| format!("Normalization failed: {}", e))?;

    let codec = PayloadCodec::new(config, PayloadSigner::new(secret));
    let encoded = codec.encode(&record).map_err(|e| format!("Encode failed: {}", e))?;

    let options = RenderOptions {
        pixel_width: width,
        include_metadata: label,
        ..RenderOptions::default()
    };
    let rendered = QrRenderer::new()
        .render(&encoded, &options)
        .map_err(|e| format!("Render failed: {}", e))?;

    if let Some(path) = image_out {
        std::fs::write(&path, &rendered.image_data_url)
            .map_err(|e| format!("Failed to write {}: {}", path, e))?;
    }

    if json_output {
        let output = json!({
            "payload": encoded.payload,
            "scan_url": rendered.scan_url,
            "image_data_url": rendered.image_data_url,
            "envelope": serde_json::to_value(&encoded.envelope)?,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", encoded.payload);
        eprintln!("Scan URL: {}", rendered.scan_url);
        if let Some(metadata) = rendered.metadata {
            eprintln!("Label: {}", metadata.label);
        }
    }

    Ok(())
}
